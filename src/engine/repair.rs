//! Best-effort structural repair of user-entered pattern text.
//!
//! Rule forms accept half-typed patterns, so seek and replacement text may
//! arrive with an unfinished escape, class, quantifier brace, or group. This
//! module appends the minimum closing delimiters to make such text balanced
//! before it reaches the pattern compiler. It never judges correctness and
//! never errors; already-balanced input passes through unchanged.

/// Balance `raw` by appending missing closing delimiters.
///
/// Scans left to right tracking a pending escape, an open `[...]`, an open
/// `{...}`, and a count of open `(...)` groups. The checks are ordered: an
/// escaped character is always taken verbatim, and everything inside an open
/// class or brace is copied through without opening further constructs
/// (except `[`, which the pattern grammar treats as special everywhere
/// outside a class). At end of input an open class gets `]`, an open brace
/// gets `}`, and each open group gets `)`; a trailing lone `\` is dropped.
///
/// # Example
/// ```
/// use soundlaw::repair;
///
/// assert_eq!(repair("(a[bc"), "(a[bc])");
/// assert_eq!(repair("x{2,"), "x{2,}");
/// assert_eq!(repair("done"), "done");
/// ```
pub fn repair(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut escaped = false;
    let mut in_class = false;
    let mut in_brace = false;
    let mut open_groups: u32 = 0;

    for ch in raw.chars() {
        if escaped {
            out.push('\\');
            out.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if in_class {
            out.push(ch);
            if ch == ']' {
                in_class = false;
            }
        } else if ch == '[' {
            in_class = true;
            out.push(ch);
        } else if in_brace {
            out.push(ch);
            if ch == '}' {
                in_brace = false;
            }
        } else if ch == '{' {
            in_brace = true;
            out.push(ch);
        } else if open_groups > 0 && ch == ')' {
            open_groups -= 1;
            out.push(ch);
        } else if ch == '(' {
            open_groups += 1;
            out.push(ch);
        } else {
            out.push(ch);
        }
    }

    if in_class {
        out.push(']');
    }
    if in_brace {
        out.push('}');
    }
    for _ in 0..open_groups {
        out.push(')');
    }
    out
}
