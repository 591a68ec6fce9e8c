// Decoration of a record with a joined relation

use serde::Serialize;

/// Result of joining a related record onto a read.
///
/// `Absent` means the relation genuinely does not exist. `Unavailable` means the
/// join could not be performed and the caller is looking at a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decoration<T> {
    Resolved(T),
    Absent,
    Unavailable(String),
}

impl<T> Decoration<T> {
    pub fn from_lookup(result: anyhow::Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Decoration::Resolved(value),
            Ok(None) => Decoration::Absent,
            Err(err) => Decoration::Unavailable(err.to_string()),
        }
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Decoration::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Decoration::Unavailable(_))
    }
}
