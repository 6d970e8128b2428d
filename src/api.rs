//! Public entry points.
//!
//! The surrounding application touches the engine in exactly three places:
//! repairing raw pattern text while a form is being edited
//! ([`repair`]), validating and compiling a rule at save time
//! ([`validate_and_compile`]), and running a stored ordered rule list over
//! one word at generation/evolution/declension time ([`apply_rule_set`]).

use crate::engine;
use crate::errors::ValidationErrors;
use crate::{CompiledRule, GroupTable, Pass, RawRuleInput};

/// Balance raw user-entered pattern text by appending missing closing
/// delimiters.
///
/// Usable standalone: the host UI calls this on raw replacement text while a
/// rule is being edited, independent of full compilation. Never errors and
/// leaves already-balanced input unchanged.
pub fn repair(raw: &str) -> String {
    engine::repair::repair(raw)
}

/// Validate a raw rule against a group table and compile it.
///
/// Returns either a rule accepted for the stored ordered list, or every
/// problem found in this attempt so the user can fix them all in one pass.
/// An invalid rule never becomes a [`CompiledRule`].
///
/// # Example
/// ```
/// use soundlaw::{
///     CharGroup, GroupTable, Pass, RawRuleInput, RuleKind, apply_rule_set,
///     validate_and_compile,
/// };
///
/// let mut groups = GroupTable::new();
/// groups.insert(CharGroup::new('V', ["a", "e", "i", "o", "u"])).unwrap();
///
/// let lenition = RawRuleInput::new("r1", RuleKind::SoundChange, "t", "d")
///     .with_context("%V_%V")
///     .with_description("intervocalic voicing");
///
/// let rule = validate_and_compile(&lenition, &groups).unwrap();
/// assert_eq!(apply_rule_set(&[rule], "ata", Pass::Forward), "ada");
/// ```
pub fn validate_and_compile(
    input: &RawRuleInput,
    groups: &GroupTable,
) -> Result<CompiledRule, ValidationErrors> {
    engine::compiler::compile(input, groups)
}

/// Apply an ordered list of compiled rules to `input` for the given pass.
///
/// Rules not participating in `pass` are skipped; the rest are folded over
/// the input in list order, each rule's output feeding the next. Total and
/// never-failing for any input string.
pub fn apply_rule_set(rules: &[CompiledRule], input: &str, pass: Pass) -> String {
    engine::runner::apply_rule_set(rules, input, pass)
}

pub use crate::engine::runner::reorder;
