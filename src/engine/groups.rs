//! Character groups and the macro table.
//!
//! A character group gives a single-character label to an ordered list of
//! characters or short strings (`V = a, e, i, o, u`). Patterns and contexts
//! reference a group as `%V`, which expands to a non-capturing alternation of
//! the members with any grammar-reserved characters escaped. The table is
//! built by the surrounding application and consumed read-only here.

use crate::errors::{Field, RuleError};
use thiserror::Error;

/// Characters with meaning in the pattern grammar; a group label must not be
/// one of these.
pub const RESERVED: &[char] =
    &['^', '$', '\\', '[', ']', '{', '}', '.', '*', '+', '(', ')', '?', '|'];

/// A named, ordered alternation of characters or short strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGroup {
    pub label: char,
    pub members: Vec<String>,
}

impl CharGroup {
    /// Build a group from anything yielding string-likes, preserving order.
    ///
    /// # Example
    /// ```
    /// use soundlaw::CharGroup;
    ///
    /// let vowels = CharGroup::new('V', ["a", "e", "i", "o", "u"]);
    /// assert_eq!(vowels.members.len(), 5);
    /// ```
    pub fn new<I, S>(label: char, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CharGroup { label, members: members.into_iter().map(Into::into).collect() }
    }
}

/// Why a group could not be added to a [`GroupTable`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("character group label `{0}` is already in use")]
    DuplicateLabel(char),

    #[error("character group label `{0}` is reserved by the pattern grammar")]
    ReservedLabel(char),
}

/// Ordered collection of character groups, keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: Vec<CharGroup>,
}

impl GroupTable {
    pub fn new() -> Self {
        GroupTable::default()
    }

    /// Add a group, rejecting reserved or already-used labels.
    pub fn insert(&mut self, group: CharGroup) -> Result<(), GroupError> {
        if RESERVED.contains(&group.label) {
            return Err(GroupError::ReservedLabel(group.label));
        }
        if self.get(group.label).is_some() {
            return Err(GroupError::DuplicateLabel(group.label));
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn get(&self, label: char) -> Option<&CharGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Expand every `%label` in `text` into a non-capturing alternation of the
/// group's members, escaping reserved characters within each member.
///
/// Unknown labels are collected (one error per distinct occurrence) rather
/// than stopping at the first, so callers can report everything at once. A
/// trailing `%` with nothing after it is taken as a literal percent sign.
pub(crate) fn expand_group_refs(
    text: &str,
    table: &GroupTable,
    field: Field,
) -> (String, Vec<RuleError>) {
    let mut out = String::with_capacity(text.len());
    let mut errors = Vec::new();
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(label) => match table.get(label) {
                Some(group) => {
                    out.push_str("(?:");
                    for (i, member) in group.members.iter().enumerate() {
                        if i > 0 {
                            out.push('|');
                        }
                        out.push_str(&regex::escape(member));
                    }
                    out.push(')');
                }
                None => errors.push(RuleError::UnknownGroup { field, label }),
            },
            None => out.push('%'),
        }
    }

    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vowels() -> GroupTable {
        let mut table = GroupTable::new();
        table.insert(CharGroup::new('V', ["a", "e", "i", "o", "u"])).unwrap();
        table
    }

    #[test]
    fn insert_rejects_reserved_label() {
        let mut table = GroupTable::new();
        let err = table.insert(CharGroup::new('$', ["x"])).unwrap_err();
        assert_eq!(err, GroupError::ReservedLabel('$'));
    }

    #[test]
    fn insert_rejects_duplicate_label() {
        let mut table = vowels();
        let err = table.insert(CharGroup::new('V', ["y"])).unwrap_err();
        assert_eq!(err, GroupError::DuplicateLabel('V'));
    }

    #[test]
    fn expansion_preserves_member_order() {
        let (expanded, errors) = expand_group_refs("%V", &vowels(), Field::Seek);
        assert!(errors.is_empty());
        assert_eq!(expanded, "(?:a|e|i|o|u)");
    }

    #[test]
    fn expansion_escapes_reserved_members() {
        let mut table = GroupTable::new();
        table.insert(CharGroup::new('P', ["t.", "k+"])).unwrap();
        let (expanded, errors) = expand_group_refs("%P", &table, Field::Seek);
        assert!(errors.is_empty());
        assert_eq!(expanded, r"(?:t\.|k\+)");
    }

    #[test]
    fn unknown_labels_are_all_collected() {
        let (_, errors) = expand_group_refs("%X%Y", &vowels(), Field::Context);
        assert_eq!(
            errors,
            vec![
                RuleError::UnknownGroup { field: Field::Context, label: 'X' },
                RuleError::UnknownGroup { field: Field::Context, label: 'Y' },
            ]
        );
    }

    #[test]
    fn trailing_percent_is_literal() {
        let (expanded, errors) = expand_group_refs("ab%", &vowels(), Field::Seek);
        assert!(errors.is_empty());
        assert_eq!(expanded, "ab%");
    }

    #[test]
    fn surrounding_text_is_kept() {
        let (expanded, _) = expand_group_refs("t%Vt", &vowels(), Field::Seek);
        assert_eq!(expanded, "t(?:a|e|i|o|u)t");
    }
}
