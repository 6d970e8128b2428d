//! Validation errors reported at rule-save time.
//!
//! Everything fallible in this crate happens while a rule is being validated
//! and compiled; application of a compiled rule never fails. Because the host
//! UI shows every problem with a rule in one dialog, validation collects all
//! errors for one save attempt into a [`ValidationErrors`] list instead of
//! stopping at the first.

use std::fmt;

use thiserror::Error;

/// Which field of a raw rule a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Seek,
    Replace,
    Context,
    Anticontext,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Seek => "seek",
            Field::Replace => "replace",
            Field::Context => "context",
            Field::Anticontext => "anticontext",
        };
        f.write_str(name)
    }
}

/// A single problem found while validating a raw rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("seek pattern is empty")]
    EmptySeek,

    #[error("{0}: missing mutation marker `_`")]
    MissingMarker(Field),

    #[error("{0}: more than one mutation marker `_`")]
    MultipleMarkers(Field),

    #[error("{0}: word boundary marker `#` must be the first or last character")]
    MisplacedBoundary(Field),

    #[error("{field}: unknown character group `%{label}`")]
    UnknownGroup { field: Field, label: char },

    /// The assembled pattern was rejected by the regex compiler. `message` is
    /// the underlying compiler's message, passed through verbatim.
    #[error("{field}: invalid pattern: {message}")]
    InvalidPattern { field: Field, message: String },

    #[error("direction is only valid on transform rules")]
    DirectionNotAllowed,

    #[error("anticontext is only valid on sound-change and stem rules")]
    AnticontextNotAllowed,
}

/// Every problem found in one validate-and-save attempt, in the order the
/// fields were examined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<RuleError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleError> {
        self.0.iter()
    }

    /// Human-readable messages, one per problem, ready for display.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = RuleError;
    type IntoIter = std::vec::IntoIter<RuleError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
