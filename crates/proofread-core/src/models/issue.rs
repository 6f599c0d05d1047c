//! Issue payload and project-board field types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Which proofreading pass an issue represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Iteration {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
}

impl Iteration {
    pub const ALL: [Iteration; 3] = [Iteration::First, Iteration::Second, Iteration::Third];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Iteration::First => "1st",
            Iteration::Second => "2nd",
            Iteration::Third => "3rd",
        }
    }
}

/// Coarse priority flag of the project-board record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "not urgent")]
    NotUrgent,
    #[serde(rename = "urgent")]
    Urgent,
}

impl Urgency {
    pub const ALL: [Urgency; 2] = [Urgency::NotUrgent, Urgency::Urgent];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Urgency::NotUrgent => "not urgent",
            Urgency::Urgent => "urgent",
        }
    }
}

macro_rules! option_set {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s.trim())
                    .ok_or_else(|| {
                        let allowed: Vec<_> = <$ty>::ALL.iter().map(|v| v.as_str()).collect();
                        format!(concat!("unknown ", $what, " '{}', expected one of: {}"), s, allowed.join(", "))
                    })
            }
        }
    };
}

option_set!(Iteration, "iteration");
option_set!(Urgency, "urgency");

/// Status options of the project board.
pub const STATUS_OPTIONS: [&str; 3] = ["Todo", "In Progress", "Done"];

/// Content Type options of the project board.
pub const CONTENT_TYPE_OPTIONS: [&str; 5] =
    ["Course", "Tutorial", "Weblate", "Video Course", "Image Course"];

/// A custom column of the project board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectField {
    Status,
    Language,
    Iteration,
    Urgency,
    #[serde(rename = "Content Type")]
    ContentType,
}

impl ProjectField {
    pub const ALL: [ProjectField; 5] = [
        ProjectField::Status,
        ProjectField::Language,
        ProjectField::Iteration,
        ProjectField::Urgency,
        ProjectField::ContentType,
    ];

    /// Name of the field on the board.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProjectField::Status => "Status",
            ProjectField::Language => "Language",
            ProjectField::Iteration => "Iteration",
            ProjectField::Urgency => "Urgency",
            ProjectField::ContentType => "Content Type",
        }
    }

    /// Other spellings boards are known to use for this field.
    pub const fn alternatives(&self) -> &'static [&'static str] {
        match self {
            ProjectField::Status => &["status", "STATE", "State"],
            ProjectField::Language => &["language", "Lang"],
            ProjectField::Iteration => &["iteration"],
            ProjectField::Urgency => &["urgency"],
            ProjectField::ContentType => &["ContentType", "Content type", "content type", "Type"],
        }
    }

    /// Whether `value` is an accepted option. Language is free text.
    pub fn validate_value(&self, value: &str) -> bool {
        match self {
            ProjectField::Status => STATUS_OPTIONS.contains(&value),
            ProjectField::Iteration => value.parse::<Iteration>().is_ok(),
            ProjectField::Urgency => value.parse::<Urgency>().is_ok(),
            ProjectField::ContentType => CONTENT_TYPE_OPTIONS.contains(&value),
            ProjectField::Language => !value.trim().is_empty(),
        }
    }
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract field name to literal board value.
pub type ProjectFields = BTreeMap<ProjectField, String>;

/// Everything needed to file one issue. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub title: String,
    pub body: String,
    pub labels: BTreeSet<String>,
    pub project_fields: ProjectFields,
}

impl IssuePayload {
    /// Labels as a list, for trackers that take arrays.
    pub fn label_list(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    /// Value of a project field.
    pub fn field(&self, field: ProjectField) -> Option<&str> {
        self.project_fields.get(&field).map(String::as_str)
    }
}
