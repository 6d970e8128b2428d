//! The constrained context grammar and its compiler.
//!
//! A context string describes the text required immediately around a match:
//! plain pattern text interspersed with `%label` group references, exactly
//! one mutation marker `_` (where the seek pattern must match), and `#`
//! word-boundary markers allowed only as the first or last character. An
//! anticontext uses the same grammar; its truth value is inverted when the
//! rule is applied.
//!
//! Compilation splits the string at the marker and builds two anchored
//! regexes: the left side must match at the end of the text before the span,
//! the right side at the start of the text after it. Every independent
//! problem (marker arity, misplaced boundary, unknown group, a side that
//! fails to compile) is collected so the caller can display them together.

use regex::Regex;

use super::groups::{GroupTable, expand_group_refs};
use crate::errors::{Field, RuleError};

/// A compiled context (or anticontext) matcher.
///
/// `before`/`after` of `None` mean "no requirement on that side"; the default
/// context `_` has no requirement on either side and matches everywhere.
#[derive(Debug, Clone)]
pub struct CompiledContext {
    before: Option<Regex>,
    after: Option<Regex>,
    source: String,
}

impl CompiledContext {
    /// Compile `raw` against `table`, reporting every problem found.
    pub(crate) fn compile(
        raw: &str,
        table: &GroupTable,
        field: Field,
    ) -> Result<CompiledContext, Vec<RuleError>> {
        let mut errors = Vec::new();

        let markers = raw.matches('_').count();
        match markers {
            0 => errors.push(RuleError::MissingMarker(field)),
            1 => {}
            _ => errors.push(RuleError::MultipleMarkers(field)),
        }

        let chars: Vec<char> = raw.chars().collect();
        let interior_boundary =
            chars.iter().enumerate().any(|(i, &c)| c == '#' && i != 0 && i != chars.len() - 1);
        if interior_boundary {
            errors.push(RuleError::MisplacedBoundary(field));
        }

        // Even with marker/boundary problems we keep scanning for unknown
        // groups so the user sees every issue at once.
        let (left_raw, right_raw) = match raw.split_once('_') {
            Some((l, r)) if markers == 1 => (l, r),
            _ => (raw, ""),
        };

        let left_anchor = left_raw.starts_with('#');
        let left_body = left_raw.strip_prefix('#').unwrap_or(left_raw);
        let right_anchor = right_raw.ends_with('#');
        let right_body = right_raw.strip_suffix('#').unwrap_or(right_raw);

        let (left_expanded, left_errors) = expand_group_refs(left_body, table, field);
        errors.extend(left_errors);
        let (right_expanded, right_errors) = expand_group_refs(right_body, table, field);
        errors.extend(right_errors);

        let before = side_pattern(left_anchor, &left_expanded, false, field, &mut errors);
        let after = side_pattern(right_anchor, &right_expanded, true, field, &mut errors);

        if errors.is_empty() {
            Ok(CompiledContext { before, after, source: raw.to_string() })
        } else {
            Err(errors)
        }
    }

    /// The always-true context, equivalent to compiling `_`.
    pub(crate) fn anywhere() -> CompiledContext {
        CompiledContext { before: None, after: None, source: "_".to_string() }
    }

    /// True iff the text before `start` satisfies the left side and the text
    /// after `end` satisfies the right side. `start`/`end` are byte offsets
    /// of a candidate match span in `word`; a span that does not fall on
    /// character boundaries (or lies outside `word`) never matches.
    pub fn matches(&self, word: &str, start: usize, end: usize) -> bool {
        let (Some(prefix), Some(suffix)) = (word.get(..start), word.get(end..)) else {
            return false;
        };
        let before_ok = self.before.as_ref().is_none_or(|re| re.is_match(prefix));
        let after_ok = self.after.as_ref().is_none_or(|re| re.is_match(suffix));
        before_ok && after_ok
    }

    /// The raw context string this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Build the anchored regex for one side of the marker, or `None` when that
/// side imposes no requirement. The left side is pinned to the end of the
/// preceding text (`...$`), the right side to the start of the following
/// text (`^...`); a `#` boundary additionally pins the far edge.
fn side_pattern(
    boundary: bool,
    expanded: &str,
    is_right: bool,
    field: Field,
    errors: &mut Vec<RuleError>,
) -> Option<Regex> {
    if expanded.is_empty() && !boundary {
        return None;
    }

    let mut pat = String::with_capacity(expanded.len() + 6);
    if is_right {
        pat.push('^');
    } else if boundary {
        pat.push('^');
    }
    if !expanded.is_empty() {
        pat.push_str("(?:");
        pat.push_str(expanded);
        pat.push(')');
    }
    if !is_right {
        pat.push('$');
    } else if boundary {
        pat.push('$');
    }

    match Regex::new(&pat) {
        Ok(re) => Some(re),
        Err(e) => {
            errors.push(RuleError::InvalidPattern { field, message: e.to_string() });
            None
        }
    }
}
