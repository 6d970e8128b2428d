//! Applying one compiled rule to one word.
//!
//! Standard global-replace semantics: scan for the leftmost match, decide
//! whether it is gated out by context/anticontext, substitute or keep it,
//! then continue searching past it. Application is total; by construction a
//! compiled rule has well-formed matchers, so nothing here can fail.

use fancy_regex::Captures;

use super::compiler::Orientation;
use super::context::CompiledContext;

/// Rewrite every ungated, non-overlapping leftmost match of the orientation's
/// pattern in `input` with its template.
///
/// A match whose surrounding text fails the context, or satisfies the
/// anticontext, is left unmodified and scanning continues after it. An empty
/// match advances by one character so scanning always terminates.
pub(crate) fn apply_orientation(
    orientation: &Orientation,
    context: &CompiledContext,
    anticontext: Option<&CompiledContext>,
    input: &str,
) -> String {
    let mut out = String::with_capacity(input.len());
    let mut copied_to = 0usize;
    let mut search_from = 0usize;

    while search_from <= input.len() {
        // The backtracking engine can report a runtime error (e.g. hitting
        // its backtrack limit); application is total, so that ends the scan
        // with the rest of the input untouched.
        let caps = match orientation.pattern.captures_from_pos(input, search_from) {
            Ok(Some(caps)) => caps,
            Ok(None) | Err(_) => break,
        };
        let whole = caps.get(0).expect("group 0 always participates");
        let (start, end) = (whole.start(), whole.end());

        out.push_str(&input[copied_to..start]);

        let gated_in = context.matches(input, start, end)
            && anticontext.is_none_or(|anti| !anti.matches(input, start, end));
        if gated_in {
            expand_template(&mut out, &orientation.template, &caps);
        } else {
            out.push_str(whole.as_str());
        }
        copied_to = end;

        if end == start {
            match input[end..].chars().next() {
                Some(c) => search_from = end + c.len_utf8(),
                None => break,
            }
        } else {
            search_from = end;
        }
    }

    out.push_str(&input[copied_to..]);
    out
}

/// Substitute `$n` references in `template` from `caps` and append to `out`.
///
/// `$n` takes a maximal run of digits; `$0` is the whole match. A reference
/// beyond the available groups (or to a group that did not participate)
/// contributes the empty string rather than an error, mirroring how
/// user-entered templates are interpreted permissively elsewhere. A `$` not
/// followed by a digit is a literal dollar sign.
pub(crate) fn expand_template(out: &mut String, template: &str, caps: &Captures<'_>) {
    let refs = regex!(r"\$([0-9]+)");
    let mut copied_to = 0usize;

    for m in refs.captures_iter(template) {
        let whole = m.get(0).expect("group 0 always participates");
        out.push_str(&template[copied_to..whole.start()]);
        if let Ok(index) = m[1].parse::<usize>() {
            if let Some(group) = caps.get(index) {
                out.push_str(group.as_str());
            }
        }
        copied_to = whole.end();
    }

    out.push_str(&template[copied_to..]);
}
