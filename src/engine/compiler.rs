//! Rule validation and compilation.
//!
//! All fallibility in the engine lives here: a rule is validated once, at
//! save time, and every problem found in one attempt is collected into a
//! [`ValidationErrors`] list so the editing UI can show them together. A
//! [`CompiledRule`] therefore always has well-formed matchers, and applying
//! it can never fail.
//!
//! Compilation steps, per field:
//!
//! 1. Repair seek and replace independently (never context/anticontext,
//!    which have their own stricter grammar).
//! 2. Expand `%label` references in the repaired seek; in the replacement
//!    only for [`RuleKind::Transform`] rules, where the template may use
//!    groups, never for sound-change or stem rules.
//! 3. Compile context/anticontext via the context grammar; a missing context
//!    defaults to "anywhere" (`_`).
//! 4. Compile the expanded seek as a pattern, surfacing the regex compiler's
//!    message verbatim on failure. Seek patterns use a backtracking engine,
//!    so backreferences like `(.)\1` are valid.
//! 5. Fix the rule's orientation per pass from its direction tag.

use fancy_regex::Regex;

use super::context::CompiledContext;
use super::groups::{GroupTable, expand_group_refs};
use super::repair::repair;
use crate::errors::{Field, RuleError, ValidationErrors};
use crate::{Direction, Pass, RawRuleInput, RuleKind};

/// One orientation of a compiled rule: a pattern to find and a template to
/// substitute. `Out`-direction rules only have the swapped orientation.
#[derive(Debug, Clone)]
pub(crate) struct Orientation {
    pub pattern: Regex,
    pub template: String,
}

/// An immutable, validated rule ready for application.
///
/// Construction goes through [`compile`]; once built, a `CompiledRule` is
/// read-only and safe to share across threads.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    id: String,
    description: String,
    kind: RuleKind,
    direction: Direction,
    forward: Option<Orientation>,
    reverse: Option<Orientation>,
    context: CompiledContext,
    anticontext: Option<CompiledContext>,
}

impl CompiledRule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn context(&self) -> &CompiledContext {
        &self.context
    }

    pub fn anticontext(&self) -> Option<&CompiledContext> {
        self.anticontext.as_ref()
    }

    /// The orientation participating in `pass`, if any.
    pub(crate) fn orientation_for(&self, pass: Pass) -> Option<&Orientation> {
        match pass {
            Pass::Forward => self.forward.as_ref(),
            Pass::Reverse => self.reverse.as_ref(),
        }
    }

    /// Apply this rule once to `input` for the forward pass.
    ///
    /// Total: if the rule does not participate forward or nothing matches,
    /// the input comes back unchanged.
    pub fn apply(&self, input: &str) -> String {
        match self.forward.as_ref() {
            Some(orientation) => super::applier::apply_orientation(
                orientation,
                &self.context,
                self.anticontext.as_ref(),
                input,
            ),
            None => input.to_string(),
        }
    }
}

/// Validate `input` against `groups` and compile it, collecting every
/// problem found.
pub(crate) fn compile(
    input: &RawRuleInput,
    groups: &GroupTable,
) -> Result<CompiledRule, ValidationErrors> {
    let mut errors: Vec<RuleError> = Vec::new();

    if input.seek.trim().is_empty() {
        errors.push(RuleError::EmptySeek);
    }

    let direction = match (input.kind, input.direction) {
        (RuleKind::Transform, Some(direction)) => direction,
        (_, Some(_)) => {
            errors.push(RuleError::DirectionNotAllowed);
            Direction::Both
        }
        (_, None) => Direction::Both,
    };

    let seek_repaired = repair(&input.seek);
    let (seek_expanded, seek_errors) = expand_group_refs(&seek_repaired, groups, Field::Seek);
    errors.extend(seek_errors);

    let replace_repaired = repair(&input.replace);
    let replace_template = if input.kind == RuleKind::Transform {
        let (expanded, replace_errors) =
            expand_group_refs(&replace_repaired, groups, Field::Replace);
        errors.extend(replace_errors);
        expanded
    } else {
        replace_repaired.clone()
    };

    let seek_pattern = match Regex::new(&seek_expanded) {
        Ok(re) => Some(re),
        Err(e) => {
            errors.push(RuleError::InvalidPattern { field: Field::Seek, message: e.to_string() });
            None
        }
    };

    let context = match input.context.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match CompiledContext::compile(raw, groups, Field::Context) {
            Ok(ctx) => ctx,
            Err(mut ctx_errors) => {
                errors.append(&mut ctx_errors);
                CompiledContext::anywhere()
            }
        },
        None => CompiledContext::anywhere(),
    };

    let anticontext = match input.anticontext.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => {
            if input.kind == RuleKind::Transform {
                errors.push(RuleError::AnticontextNotAllowed);
                None
            } else {
                match CompiledContext::compile(raw, groups, Field::Anticontext) {
                    Ok(ctx) => Some(ctx),
                    Err(mut anti_errors) => {
                        errors.append(&mut anti_errors);
                        None
                    }
                }
            }
        }
        None => None,
    };

    // The reverse pass for an `Out` rule runs the rule swapped, so its
    // replacement text must itself compile as a pattern.
    let (forward, reverse) = match direction {
        Direction::Both | Direction::Double => {
            let orientation = seek_pattern
                .map(|pattern| Orientation { pattern, template: replace_template.clone() });
            (orientation.clone(), orientation)
        }
        Direction::In => {
            let orientation =
                seek_pattern.map(|pattern| Orientation { pattern, template: replace_template });
            (orientation, None)
        }
        Direction::Out => {
            let swapped = match Regex::new(&replace_template) {
                Ok(pattern) => Some(Orientation { pattern, template: seek_repaired }),
                Err(e) => {
                    errors.push(RuleError::InvalidPattern {
                        field: Field::Replace,
                        message: e.to_string(),
                    });
                    None
                }
            };
            (None, swapped)
        }
    };

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    if crate::debug_enabled() {
        eprintln!(
            "[rule:compiled] id={:?} kind={:?} direction={:?} seek={:?}",
            input.id, input.kind, direction, seek_expanded,
        );
    }

    Ok(CompiledRule {
        id: input.id.clone(),
        description: input.description.clone(),
        kind: input.kind,
        direction,
        forward,
        reverse,
        context,
        anticontext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::groups::CharGroup;

    fn vowels() -> GroupTable {
        let mut table = GroupTable::new();
        table.insert(CharGroup::new('V', ["a", "e", "i", "o", "u"])).unwrap();
        table
    }

    #[test]
    fn empty_seek_is_rejected() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "  ", "d");
        let errs = compile(&input, &vowels()).unwrap_err();
        assert!(errs.iter().any(|e| *e == RuleError::EmptySeek));
    }

    #[test]
    fn all_problems_are_collected_in_one_attempt() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "", "d")
            .with_context("ab")
            .with_anticontext("x_y_z");
        let errs = compile(&input, &vowels()).unwrap_err();

        assert!(errs.iter().any(|e| *e == RuleError::EmptySeek));
        assert!(errs.iter().any(|e| *e == RuleError::MissingMarker(Field::Context)));
        assert!(errs.iter().any(|e| *e == RuleError::MultipleMarkers(Field::Anticontext)));
        assert_eq!(errs.len(), 3);
    }

    #[test]
    fn seek_groups_expand_to_alternations() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "%V", "x");
        let rule = compile(&input, &vowels()).unwrap();
        assert_eq!(rule.apply("ae"), "xx");
        assert_eq!(rule.apply("pt"), "pt");
    }

    #[test]
    fn replace_groups_expand_only_for_transforms() {
        let table = vowels();

        let stem = RawRuleInput::new("r1", RuleKind::Stem, "x", "%V");
        let rule = compile(&stem, &table).unwrap();
        assert_eq!(rule.apply("x"), "%V");

        let transform = RawRuleInput::new("r2", RuleKind::Transform, "x", "%V");
        let rule = compile(&transform, &table).unwrap();
        assert_eq!(rule.apply("x"), "(?:a|e|i|o|u)");
    }

    #[test]
    fn unbalanced_seek_is_repaired_before_compiling() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "(ab", "$1");
        let rule = compile(&input, &vowels()).unwrap();
        assert_eq!(rule.apply("ab"), "ab");
        assert_eq!(rule.apply("xaby"), "xaby");
    }

    #[test]
    fn invalid_quantifier_surfaces_compiler_message() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "a{3,1}", "x");
        let errs = compile(&input, &vowels()).unwrap_err();
        let invalid = errs
            .iter()
            .find(|e| matches!(e, RuleError::InvalidPattern { field: Field::Seek, .. }))
            .unwrap();
        assert!(!invalid.to_string().is_empty());
    }

    #[test]
    fn direction_on_sound_change_is_rejected() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "a", "b")
            .with_direction(Direction::In);
        let errs = compile(&input, &vowels()).unwrap_err();
        assert!(errs.iter().any(|e| *e == RuleError::DirectionNotAllowed));
    }

    #[test]
    fn anticontext_on_transform_is_rejected() {
        let input =
            RawRuleInput::new("r1", RuleKind::Transform, "a", "b").with_anticontext("_#");
        let errs = compile(&input, &vowels()).unwrap_err();
        assert!(errs.iter().any(|e| *e == RuleError::AnticontextNotAllowed));
    }

    #[test]
    fn missing_context_means_anywhere() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "t", "d");
        let rule = compile(&input, &vowels()).unwrap();
        assert_eq!(rule.apply("tat"), "dad");
    }

    #[test]
    fn empty_context_string_means_anywhere() {
        let input = RawRuleInput::new("r1", RuleKind::SoundChange, "t", "d").with_context("");
        let rule = compile(&input, &vowels()).unwrap();
        assert_eq!(rule.apply("tat"), "dad");
    }

    #[test]
    fn out_rule_compiles_the_swapped_orientation() {
        let input = RawRuleInput::new("r1", RuleKind::Transform, "f", "ph")
            .with_direction(Direction::Out);
        let rule = compile(&input, &vowels()).unwrap();

        // Does not participate forward.
        assert!(rule.orientation_for(Pass::Forward).is_none());
        assert_eq!(rule.apply("ph"), "ph");

        // Reverse orientation rewrites the replacement back to the seek.
        let orientation = rule.orientation_for(Pass::Reverse).unwrap();
        assert_eq!(orientation.pattern.as_str(), "ph");
        assert_eq!(orientation.template, "f");
    }

    #[test]
    fn out_rule_with_unpatternable_replace_is_rejected() {
        let input = RawRuleInput::new("r1", RuleKind::Transform, "a", "b{9,1}")
            .with_direction(Direction::Out);
        let errs = compile(&input, &vowels()).unwrap_err();
        assert!(
            errs.iter()
                .any(|e| matches!(e, RuleError::InvalidPattern { field: Field::Replace, .. }))
        );
    }

    #[test]
    fn in_rule_has_no_reverse_orientation() {
        let input =
            RawRuleInput::new("r1", RuleKind::Transform, "a", "b").with_direction(Direction::In);
        let rule = compile(&input, &vowels()).unwrap();
        assert!(rule.orientation_for(Pass::Forward).is_some());
        assert!(rule.orientation_for(Pass::Reverse).is_none());
    }
}
