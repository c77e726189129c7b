//! Unit Entity
//!
//! A vehicle tracked for tire maintenance. Field names on the wire follow
//! the `fleets` document layout (`UnitNumber`, `TaskSpecifics`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::annotation::Annotation;
use super::entity::Entity;

/// Store-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Work priority; unknown values read as `Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Display rank, lower comes first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from_str(&s)
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

/// One finding recorded when a unit is composed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpecific {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub specifics: String,
    #[serde(default)]
    pub tread_depth: String,
    #[serde(default)]
    pub needed_tire: String,
}

impl TaskSpecific {
    pub fn new(position: &str, specifics: &str, tread_depth: &str, needed_tire: &str) -> Self {
        Self {
            position: position.to_string(),
            specifics: specifics.to_string(),
            tread_depth: tread_depth.to_string(),
            needed_tire: needed_tire.to_string(),
        }
    }

    /// Copy with every field trimmed
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.position.trim(),
            self.specifics.trim(),
            self.tread_depth.trim(),
            self.needed_tire.trim(),
        )
    }

    pub fn is_blank(&self) -> bool {
        self.position.trim().is_empty()
            && self.specifics.trim().is_empty()
            && self.tread_depth.trim().is_empty()
            && self.needed_tire.trim().is_empty()
    }
}

/// A maintenance work item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Document id; never stored inside the document body
    #[serde(skip)]
    pub id: Option<UnitId>,
    #[serde(rename = "UnitNumber", default)]
    pub unit_number: String,
    /// Raw grouping key, not normalized
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
    /// Append-only
    #[serde(rename = "TaskSpecifics", default)]
    pub task_specifics: Vec<TaskSpecific>,
    #[serde(default)]
    pub comments: Vec<Annotation>,
}

impl Unit {
    /// Create a local, not-yet-submitted unit
    pub fn new(unit_number: &str, customer: &str, priority: Priority) -> Self {
        Self {
            id: None,
            unit_number: unit_number.to_string(),
            customer: customer.to_string(),
            priority,
            done: false,
            task_specifics: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Attach a store-assigned id
    pub fn with_id(mut self, id: UnitId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Partial field update for a unit
///
/// Only the fields that are `Some` are sent to the store and merged locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Annotation>>,
}

impl UnitPatch {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Default::default()
        }
    }

    pub fn comments(comments: Vec<Annotation>) -> Self {
        Self {
            comments: Some(comments),
            ..Default::default()
        }
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_none() && self.priority.is_none() && self.comments.is_none()
    }
}

impl Entity for Unit {
    type Id = UnitId;
    type Patch = UnitPatch;

    fn id(&self) -> Option<&UnitId> {
        self.id.as_ref()
    }

    fn patched(&self, patch: &UnitPatch) -> Self {
        let mut unit = self.clone();
        if let Some(done) = patch.done {
            unit.done = done;
        }
        if let Some(priority) = patch.priority {
            unit.priority = priority;
        }
        if let Some(comments) = &patch.comments {
            unit.comments = comments.clone();
        }
        unit
    }
}
