//! The rule-compilation and application pipeline.
//!
//! Compiling and running a rule is a pipeline with all fallibility pushed to
//! the compile side:
//!
//! ```text
//! raw seek/replace ── repair ──┐              (repair.rs)
//!                              │
//! %label references ── expand ─┼─ GroupTable  (groups.rs)
//!                              │
//! context/anticontext ─────────┼─ CompiledContext
//!    (exactly one `_`,         │              (context.rs)
//!     edge-only `#`)           v
//!                        CompiledRule         (compiler.rs)
//!                              │
//! word ────────────────────────┼─ gated global replace
//!                              │              (applier.rs)
//!                              v
//!                    ordered fold over rules  (runner.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `repair.rs`: inserts the minimum closing delimiters so user-entered
//!   seek/replace text is structurally balanced. Never errors.
//! - `groups.rs`: the macro table (`CharGroup` / `GroupTable`) and `%label`
//!   expansion into non-capturing alternations.
//! - `context.rs`: validates and compiles the constrained context grammar
//!   into a `CompiledContext` matcher.
//! - `compiler.rs`: assembles a `CompiledRule` from raw input, collecting
//!   every validation problem instead of stopping at the first.
//! - `applier.rs`: leftmost non-overlapping global replace with context and
//!   anticontext gating and `$n` capture templates. Total; never fails.
//! - `runner.rs`: folds an ordered rule list over one word for a given pass,
//!   plus the id-addressed `RuleSet` container.
//!
//! ## Invariants
//!
//! - A `CompiledRule` only exists if validation found zero problems, so
//!   application never has a recoverable error path.
//! - Rule order is semantically meaningful: rule *i + 1* sees rule *i*'s
//!   output. Order changes only through explicit reordering.
//!
//! ## Debugging
//!
//! Set `SOUNDLAW_DEBUG_RULES=1` to print compilation and application traces.

pub(crate) mod applier;
pub(crate) mod compiler;
pub(crate) mod context;
pub(crate) mod groups;
pub(crate) mod repair;
pub(crate) mod runner;
