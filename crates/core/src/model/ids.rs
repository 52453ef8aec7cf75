use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Domain (e.g. `"people"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(String);

/// Unique identifier for a Task within the curriculum (e.g. `"p2"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

/// Globally unique identifier for an Enabler (e.g. `"p2-3"`).
///
/// The atomic unit of completion tracking.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnablerId(String);

/// Unique identifier for a generated exam Question.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Creates a new identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(DomainId);
string_id!(TaskId);
string_id!(EnablerId);
string_id!(QuestionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabler_id_display() {
        let id = EnablerId::new("p2-3");
        assert_eq!(id.to_string(), "p2-3");
        assert_eq!(id.as_str(), "p2-3");
    }

    #[test]
    fn task_id_debug_includes_type() {
        let id = TaskId::new("pr8");
        assert_eq!(format!("{id:?}"), "TaskId(pr8)");
    }

    #[test]
    fn ids_with_same_value_are_equal() {
        assert_eq!(DomainId::from("people"), DomainId::new("people"));
        assert_ne!(QuestionId::new("q1"), QuestionId::new("q2"));
    }
}
