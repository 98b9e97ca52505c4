use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a phase or task.
///
/// Legacy flows accept both integers and strings; conditional flows only ever
/// produce the `Str` variant. The two variants never compare equal, so `1` and
/// `"1"` are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowId {
    Int(i64),
    Str(String),
}

impl FlowId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlowId::Int(n) => Some(*n),
            FlowId::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlowId::Int(_) => None,
            FlowId::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowId::Int(n) => write!(f, "{}", n),
            FlowId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FlowId {
    fn from(value: i64) -> Self {
        FlowId::Int(value)
    }
}

impl From<&str> for FlowId {
    fn from(value: &str) -> Self {
        FlowId::Str(value.to_string())
    }
}

impl From<String> for FlowId {
    fn from(value: String) -> Self {
        FlowId::Str(value)
    }
}

impl From<&String> for FlowId {
    fn from(value: &String) -> Self {
        FlowId::Str(value.clone())
    }
}

/// Renders a list of ids as `a, b, c` for error messages.
pub(crate) fn join_ids(ids: &[FlowId]) -> String {
    use itertools::Itertools;
    ids.iter().join(", ")
}

/// Renders a cycle path as `a -> b -> a`.
pub(crate) fn join_path(ids: &[FlowId]) -> String {
    use itertools::Itertools;
    ids.iter().join(" -> ")
}
