//! Status and kind enums shared by every work item.
//!
//! Both enums have a stable textual token form (`NEW`, `IN_PROGRESS`,
//! `TASK`, ...) used by the flat-record persistence format and by
//! `Display`. [`Status::from_token`] / [`TaskKind::from_token`] are the
//! inverse and return `None` for unknown tokens so the codec can attach
//! its own line context to the failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a work item.
///
/// Plain tasks and subtasks carry the status their caller assigns. Epic
/// status is derived from the epic's subtasks and is overwritten by the
/// store on every recompute:
///
/// - `New` -- no subtasks, or every subtask is `New`.
/// - `Done` -- at least one subtask and every subtask is `Done`.
/// - `InProgress` -- anything else (mixed, or any subtask in progress).
///
/// # Examples
///
/// ```
/// use taskboard::Status;
///
/// assert_eq!(Status::InProgress.to_string(), "IN_PROGRESS");
/// assert_eq!(Status::from_token("DONE"), Some(Status::Done));
/// assert_eq!(Status::from_token("banana"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Not started.
    New,
    /// Started but not finished.
    InProgress,
    /// Finished.
    Done,
}

impl Status {
    /// Returns the textual token used in flat records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Parses the textual token form. Returns `None` for unknown tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "NEW" => Some(Self::New),
            "IN_PROGRESS" => Some(Self::InProgress),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete kind of a work item.
///
/// # Examples
///
/// ```
/// use taskboard::TaskKind;
///
/// assert_eq!(TaskKind::Subtask.to_string(), "SUBTASK");
/// assert_eq!(TaskKind::from_token("EPIC"), Some(TaskKind::Epic));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    /// A standalone schedulable task.
    Task,
    /// A grouping task whose status and time span are derived.
    Epic,
    /// A task owned by exactly one epic.
    Subtask,
}

impl TaskKind {
    /// Returns the textual token used in flat records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Epic => "EPIC",
            Self::Subtask => "SUBTASK",
        }
    }

    /// Parses the textual token form. Returns `None` for unknown tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TASK" => Some(Self::Task),
            "EPIC" => Some(Self::Epic),
            "SUBTASK" => Some(Self::Subtask),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_matches_tokens() {
        assert_eq!(Status::New.to_string(), "NEW");
        assert_eq!(Status::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(Status::Done.to_string(), "DONE");
    }

    #[test]
    fn status_token_round_trip() {
        for status in [Status::New, Status::InProgress, Status::Done] {
            assert_eq!(Status::from_token(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_rejects_unknown_token() {
        assert_eq!(Status::from_token(""), None);
        assert_eq!(Status::from_token("new"), None);
        assert_eq!(Status::from_token("CANCELLED"), None);
    }

    #[test]
    fn status_serde_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).unwrap(),
            "IN_PROGRESS"
        );
        let back: Status = serde_json::from_value(serde_json::json!("NEW")).unwrap();
        assert_eq!(back, Status::New);
    }

    #[test]
    fn kind_token_round_trip() {
        for kind in [TaskKind::Task, TaskKind::Epic, TaskKind::Subtask] {
            assert_eq!(TaskKind::from_token(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn kind_rejects_unknown_token() {
        assert_eq!(TaskKind::from_token("STORY"), None);
        assert_eq!(TaskKind::from_token("task"), None);
    }
}
