use serde::{Deserialize, Serialize};

/// Identifies the show a statement belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventInfo {
    pub name: String,
    /// Day/month/year as typed, e.g. `25/12/2024`.
    pub date: String,
    pub location: String,
}

impl EventInfo {
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            location: location.into(),
        }
    }
}
