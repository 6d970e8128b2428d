//! Pattern-based text-transformation rule engine for conlang tooling.
//!
//! A user supplies a small declarative rule: a seek pattern, a replacement,
//! optional surrounding context/anticontext, and optional named character
//! groups referenced as `%label`. This crate compiles that rule into a safe,
//! order-sensitive text transformer, and folds ordered lists of compiled
//! rules over words. The same engine backs word-generation transforms,
//! sound-change (evolution) rules, and declension/conjugation stem rules.
//!
//! The crate is split into two phases, and all fallibility lives in the
//! first:
//!
//! 1. **Validate and compile** ([`validate_and_compile`]): repairs unbalanced
//!    grouping constructs, expands `%label` references, compiles the
//!    constrained context grammar, and collects *every* problem found into a
//!    [`ValidationErrors`] list. An invalid rule never becomes a
//!    [`CompiledRule`].
//! 2. **Apply** ([`apply_rule_set`]): total and never-failing. A compiled
//!    rule set is read-only, `Send + Sync`, and safe to apply concurrently
//!    to different words.
//!
//! Set `SOUNDLAW_DEBUG_RULES=1` to print per-rule application traces.

#[macro_use]
mod macros;
mod api;
mod engine;
mod errors;

pub use api::{apply_rule_set, repair, reorder, validate_and_compile};
pub use engine::compiler::CompiledRule;
pub use engine::context::CompiledContext;
pub use engine::groups::{CharGroup, GroupError, GroupTable, RESERVED};
pub use engine::runner::RuleSet;
pub use errors::{Field, RuleError, ValidationErrors};

// --- Core rule model --------------------------------------------------------

/// What flavor of rule this is. The compiler branches on this tag: direction
/// is only meaningful for [`RuleKind::Transform`], anticontext only for
/// [`RuleKind::SoundChange`] and [`RuleKind::Stem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Evolution sound-change rule (context + anticontext).
    SoundChange,
    /// Word-generation transform (direction; `%label` also expands in the
    /// replacement).
    Transform,
    /// Declension/conjugation stem rule (context + anticontext).
    Stem,
}

/// Which side(s) of a bidirectional transform pipeline a rule participates
/// in. Only meaningful for [`RuleKind::Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Apply seek → replace in both passes.
    Both,
    /// Apply seek → replace in both passes, independently per pass.
    Double,
    /// Apply only on the forward pass.
    In,
    /// Apply only on the reverse pass, with seek and replace swapped.
    Out,
}

/// Which side of a bidirectional pipeline is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Forward,
    Reverse,
}

/// A raw rule record as gathered from an editing form, before validation.
///
/// The surrounding UI collects field values into this structure and hands it
/// to [`validate_and_compile`]; the engine never reads form state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRuleInput {
    /// Opaque unique identifier; used for addressing the rule for
    /// edit/delete/reorder, never for matching.
    pub id: String,
    pub kind: RuleKind,
    /// Search pattern; may reference character groups via `%label`.
    pub seek: String,
    /// Replacement template; may reference capture groups `$1`, `$2`, ...
    pub replace: String,
    /// Optional context with exactly one `_` and edge-only `#` markers.
    pub context: Option<String>,
    /// Optional disqualifying context of the same grammar.
    pub anticontext: Option<String>,
    /// Only meaningful for [`RuleKind::Transform`]; defaults to
    /// [`Direction::Both`].
    pub direction: Option<Direction>,
    /// Free-text label; not interpreted by the engine.
    pub description: String,
}

impl RawRuleInput {
    pub fn new(
        id: impl Into<String>,
        kind: RuleKind,
        seek: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        RawRuleInput {
            id: id.into(),
            kind,
            seek: seek.into(),
            replace: replace.into(),
            context: None,
            anticontext: None,
            direction: None,
            description: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_anticontext(mut self, anticontext: impl Into<String>) -> Self {
        self.anticontext = Some(anticontext.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

pub(crate) fn debug_enabled() -> bool {
    std::env::var_os("SOUNDLAW_DEBUG_RULES").is_some()
}
