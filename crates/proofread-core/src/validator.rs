//! Request validation.
//!
//! Checks a raw issue request against the catalog and the closed value
//! sets, collecting every failing field instead of stopping at the first.

use crate::catalog::Catalog;
use crate::models::{ContentItem, ContentKind, Iteration, Language, Urgency};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue request as submitted, before any checking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssueRequest {
    /// Item id; `category/name` for tutorials
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub iteration: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
}

impl RawIssueRequest {
    /// Builder: Set item id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Builder: Set language code.
    pub fn with_language(mut self, code: &str) -> Self {
        self.language = Some(code.to_string());
        self
    }

    /// Builder: Set branch.
    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    /// Builder: Set iteration.
    pub fn with_iteration(mut self, iteration: &str) -> Self {
        self.iteration = Some(iteration.to_string());
        self
    }

    /// Builder: Set urgency.
    pub fn with_urgency(mut self, urgency: &str) -> Self {
        self.urgency = Some(urgency.to_string());
        self
    }
}

/// A request that passed every check, with catalog entries resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub kind: ContentKind,
    /// Absent only for kinds without an item
    pub item: Option<ContentItem>,
    pub language: Language,
    /// Absent only for kinds that link no branch
    pub branch: Option<String>,
    pub iteration: Iteration,
    pub urgency: Urgency,
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FieldErrorKind {
    Missing,
    Invalid,
    /// Well-formed but absent from the catalog
    NotFound { what: &'static str },
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub kind: FieldErrorKind,
}

/// Every field that failed validation, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// First error reported for `field`.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// When every error is a catalog miss, the first one and what it was.
    pub fn only_not_found(&self) -> Option<(&'static str, &FieldError)> {
        let first = self.errors.first()?;
        let what = match first.kind {
            FieldErrorKind::NotFound { what } => what,
            _ => return None,
        };
        self.errors
            .iter()
            .all(|e| matches!(e.kind, FieldErrorKind::NotFound { .. }))
            .then_some((what, first))
    }

    fn missing(&mut self, field: &'static str) {
        self.errors.push(FieldError {
            field,
            value: String::new(),
            reason: format!("{field} is required"),
            kind: FieldErrorKind::Missing,
        });
    }

    fn invalid(&mut self, field: &'static str, value: &str, reason: String) {
        self.errors.push(FieldError {
            field,
            value: value.to_string(),
            reason,
            kind: FieldErrorKind::Invalid,
        });
    }

    fn not_found(&mut self, field: &'static str, what: &'static str, value: &str) {
        self.errors.push(FieldError {
            field,
            value: value.to_string(),
            reason: format!("{what} '{value}' does not exist"),
            kind: FieldErrorKind::NotFound { what },
        });
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Trimmed non-empty value, if any.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Reason a branch name is unusable, if it is.
pub fn branch_name_problem(branch: &str) -> Option<&'static str> {
    if branch.is_empty() {
        Some("branch name is empty")
    } else if branch.chars().any(char::is_whitespace) {
        Some("branch name must not contain spaces")
    } else if branch.starts_with('-') {
        Some("branch name must not start with '-'")
    } else {
        None
    }
}

/// Split a tutorial id into category and name.
pub fn split_tutorial_id(id: &str) -> Option<(&str, &str)> {
    id.split_once('/')
        .filter(|(category, name)| !category.is_empty() && !name.is_empty())
}

/// Validate `raw` as a request for an issue of `kind`.
pub fn validate(
    kind: ContentKind,
    raw: &RawIssueRequest,
    catalog: &Catalog,
) -> Result<ValidatedInput, ValidationFailure> {
    let mut failure = ValidationFailure::default();

    let item = if kind.requires_item() {
        match present(&raw.id) {
            None => {
                failure.missing("id");
                None
            }
            Some(id) if kind == ContentKind::Tutorial && split_tutorial_id(id).is_none() => {
                failure.invalid("id", id, "tutorial id must be 'category/name'".to_string());
                None
            }
            Some(id) => match catalog.get(kind, id) {
                Ok(item) => Some(item.clone()),
                Err(_) => {
                    failure.not_found("id", kind.item_noun(), id);
                    None
                }
            },
        }
    } else {
        None
    };

    let language = match present(&raw.language) {
        None => {
            failure.missing("language");
            None
        }
        Some(code) => match catalog.language(code) {
            Ok(language) => Some(language.clone()),
            Err(_) => {
                failure.not_found("language", "language", code);
                None
            }
        },
    };

    let iteration = match present(&raw.iteration) {
        None => {
            failure.missing("iteration");
            None
        }
        Some(value) => match value.parse::<Iteration>() {
            Ok(iteration) => Some(iteration),
            Err(reason) => {
                failure.invalid("iteration", value, reason);
                None
            }
        },
    };

    let urgency = match present(&raw.urgency) {
        None => {
            failure.missing("urgency");
            None
        }
        Some(value) => match value.parse::<Urgency>() {
            Ok(urgency) => Some(urgency),
            Err(reason) => {
                failure.invalid("urgency", value, reason);
                None
            }
        },
    };

    let branch = if kind.requires_branch() {
        match raw.branch.as_deref().map(str::trim) {
            None | Some("") => {
                failure.missing("branch");
                None
            }
            Some(branch) => match branch_name_problem(branch) {
                Some(reason) => {
                    failure.invalid("branch", branch, reason.to_string());
                    None
                }
                None => Some(branch.to_string()),
            },
        }
    } else {
        None
    };

    match (language, iteration, urgency) {
        (Some(language), Some(iteration), Some(urgency)) if failure.is_empty() => {
            Ok(ValidatedInput {
                kind,
                item,
                language,
                branch,
                iteration,
                urgency,
            })
        }
        _ => Err(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn catalog() -> Catalog {
        Catalog::with_default_languages(vec![
            ContentItem::course("btc101", "Bitcoin 101", "u-1"),
            ContentItem::tutorial("wallet", "alby", "Alby", "u-2"),
            ContentItem::tutorial_section(vec!["wallet".into()]),
        ])
    }

    fn complete(id: &str) -> RawIssueRequest {
        RawIssueRequest::default()
            .with_id(id)
            .with_language("es")
            .with_branch("dev")
            .with_iteration("1st")
            .with_urgency("not urgent")
    }

    #[test]
    fn accepts_complete_request() {
        let input = validate(ContentKind::Course, &complete("btc101"), &catalog()).unwrap();
        assert_eq!(input.item.unwrap().id, "btc101");
        assert_eq!(input.language.code, "es");
        assert_eq!(input.branch.as_deref(), Some("dev"));
        assert_eq!(input.iteration, Iteration::First);
        assert_eq!(input.urgency, Urgency::NotUrgent);
    }

    #[test]
    fn video_course_resolves_against_courses() {
        assert!(validate(ContentKind::VideoCourse, &complete("btc101"), &catalog()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let raw = RawIssueRequest::default()
            .with_id("btc101")
            .with_language("es")
            .with_branch("my branch")
            .with_iteration("4th");
        let failure = validate(ContentKind::Course, &raw, &catalog()).unwrap_err();

        assert_eq!(failure.errors.len(), 3);
        assert_eq!(failure.field("iteration").unwrap().kind, FieldErrorKind::Invalid);
        assert_eq!(failure.field("urgency").unwrap().kind, FieldErrorKind::Missing);
        assert_eq!(failure.field("branch").unwrap().kind, FieldErrorKind::Invalid);
        assert!(failure.field("id").is_none());
        assert!(matches!(Error::from(failure), Error::Validation(_)));
    }

    #[test]
    fn unknown_item_only_is_not_found() {
        let failure = validate(ContentKind::Course, &complete("btc999"), &catalog()).unwrap_err();
        assert_eq!(
            failure.field("id").unwrap().kind,
            FieldErrorKind::NotFound { what: "course" }
        );
        match Error::from(failure) {
            Error::NotFound { what, id } => {
                assert_eq!(what, "course");
                assert_eq!(id, "btc999");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn unknown_language_with_bad_urgency_is_validation() {
        let raw = complete("btc101").with_language("xx").with_urgency("asap");
        let failure = validate(ContentKind::Course, &raw, &catalog()).unwrap_err();
        assert!(failure.only_not_found().is_none());
        assert!(matches!(Error::from(failure), Error::Validation(_)));
    }

    #[test]
    fn tutorial_id_shape() {
        let failure = validate(ContentKind::Tutorial, &complete("alby"), &catalog()).unwrap_err();
        assert_eq!(failure.field("id").unwrap().kind, FieldErrorKind::Invalid);

        assert!(validate(ContentKind::Tutorial, &complete("wallet/alby"), &catalog()).is_ok());
        assert_eq!(split_tutorial_id("wallet/"), None);
        assert_eq!(split_tutorial_id("a/b/c"), Some(("a", "b/c")));
    }

    #[test]
    fn branch_rules() {
        assert!(branch_name_problem("dev").is_none());
        assert!(branch_name_problem("translation/es").is_none());
        assert!(branch_name_problem("-force").is_some());
        assert!(branch_name_problem("a b").is_some());
        assert!(branch_name_problem("").is_some());

        let raw = complete("btc101").with_branch("  ");
        let failure = validate(ContentKind::Course, &raw, &catalog()).unwrap_err();
        assert_eq!(failure.field("branch").unwrap().kind, FieldErrorKind::Missing);
    }

    #[test]
    fn weblate_needs_no_item_or_branch() {
        let raw = RawIssueRequest::default()
            .with_language("fr")
            .with_iteration("2nd")
            .with_urgency("urgent");
        let input = validate(ContentKind::Weblate, &raw, &catalog()).unwrap();
        assert!(input.item.is_none());
        assert!(input.branch.is_none());

        let ignored = raw.with_branch("has spaces");
        assert!(validate(ContentKind::Weblate, &ignored, &catalog()).is_ok());
    }

    #[test]
    fn failure_display_lists_fields() {
        let failure = validate(ContentKind::Course, &RawIssueRequest::default(), &catalog())
            .unwrap_err();
        assert_eq!(failure.errors.len(), 5);
        let text = failure.to_string();
        assert!(text.starts_with("id: id is required"));
        assert!(text.contains("urgency: urgency is required"));
    }
}
