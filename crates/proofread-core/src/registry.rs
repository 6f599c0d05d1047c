//! Issue templates per content kind.
//!
//! Each kind maps to one [`IssueSpecTemplate`] record. Title, body lines and
//! labels are patterns with `{placeholder}` tokens resolved from the
//! validated input; nothing about a kind is decided by code branching.
//!
//! Placeholders available to every template:
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{language}` | language code |
//! | `{branch}` | branch name, when the kind links one |
//! | `{item}` | item id (course, tutorial and section kinds) |
//! | `{category}`, `{name}` | tutorial id halves |
//! | `{section}` | tutorial section path |
//! | `{uuid}`, `{title_slug}` | item metadata, when scanned |
//! | `{planb}`, `{github}`, `{weblate}` | site base URLs |

use crate::error::{Error, Result};
use crate::models::{ContentKind, IssuePayload, ProjectField, ProjectFields};
use crate::urls::{GITHUB_BASE_URL, PLANB_BASE_URL, WEBLATE_BASE_URL};
use crate::validator::{split_tutorial_id, ValidatedInput};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Status every new issue starts in.
pub const INITIAL_STATUS: &str = "Todo";

/// When a body line is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCondition {
    Always,
    /// Skipped when the target language is English
    NonEnglishLanguage,
}

/// One line of an issue body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLine {
    pub pattern: String,
    pub condition: LineCondition,
}

impl BodyLine {
    pub fn always(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            condition: LineCondition::Always,
        }
    }

    pub fn non_english(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            condition: LineCondition::NonEnglishLanguage,
        }
    }

    fn applies(&self, language_code: &str) -> bool {
        match self.condition {
            LineCondition::Always => true,
            LineCondition::NonEnglishLanguage => language_code != "en",
        }
    }
}

/// Everything that varies between issue kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSpecTemplate {
    pub kind: ContentKind,
    pub title_pattern: String,
    pub body_line_templates: Vec<BodyLine>,
    pub fixed_labels: Vec<String>,
    pub language_label_pattern: String,
    /// Literal value of the Content Type project field
    pub content_type: String,
    /// Literal value of the Status project field
    pub status: String,
    pub requires_item: bool,
    pub requires_branch: bool,
}

impl IssueSpecTemplate {
    fn new(kind: ContentKind, title_pattern: &str, content_type: &str) -> Self {
        Self {
            kind,
            title_pattern: title_pattern.to_string(),
            body_line_templates: Vec::new(),
            fixed_labels: Vec::new(),
            language_label_pattern: "language - {language}".to_string(),
            content_type: content_type.to_string(),
            status: INITIAL_STATUS.to_string(),
            requires_item: kind.requires_item(),
            requires_branch: kind.requires_branch(),
        }
    }

    fn lines(mut self, lines: Vec<BodyLine>) -> Self {
        self.body_line_templates = lines;
        self
    }

    fn labels(mut self, labels: &[&str]) -> Self {
        self.fixed_labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    fn language_label(mut self, pattern: &str) -> Self {
        self.language_label_pattern = pattern.to_string();
        self
    }
}

/// Placeholder values for one derivation.
#[derive(Debug, Default, Clone)]
pub struct Bindings(BTreeMap<&'static str, String>);

impl Bindings {
    /// Bindings for `input`, including the site base URLs.
    pub fn for_input(input: &ValidatedInput) -> Self {
        let mut bindings = Self::default();
        bindings.set("planb", PLANB_BASE_URL);
        bindings.set("github", GITHUB_BASE_URL);
        bindings.set("weblate", WEBLATE_BASE_URL);
        bindings.set("language", &input.language.code);
        if let Some(branch) = &input.branch {
            bindings.set("branch", branch);
        }
        if let Some(item) = &input.item {
            bindings.set("item", &item.id);
            match input.kind {
                ContentKind::Tutorial => {
                    if let Some((category, name)) = split_tutorial_id(&item.id) {
                        bindings.set("category", category);
                        bindings.set("name", name);
                    }
                }
                ContentKind::TutorialSection => bindings.set("section", &item.id),
                _ => {}
            }
            if let Some(uuid) = item.uuid() {
                bindings.set("uuid", uuid);
            }
            if let Some(slug) = item.title_slug() {
                bindings.set("title_slug", slug);
            }
        }
        bindings
    }

    pub fn set(&mut self, name: &'static str, value: &str) {
        self.0.insert(name, value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Substitute every `{name}` in `pattern`.
    pub fn render(&self, pattern: &str) -> Result<String> {
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| Error::Template(format!("unclosed placeholder in '{pattern}'")))?;
            let name = &after[..close];
            let value = self.get(name).ok_or_else(|| {
                Error::Template(format!("no value for placeholder '{{{name}}}' in '{pattern}'"))
            })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Lookup of issue templates by kind.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<ContentKind, IssueSpecTemplate>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    /// Registry holding `templates`; a later template replaces an earlier one
    /// of the same kind.
    pub fn new(templates: impl IntoIterator<Item = IssueSpecTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.kind, t)).collect(),
        }
    }

    /// The templates used on the PlanB Network project board.
    pub fn builtin() -> Self {
        const PBN_COURSE: &str = "{planb}/en/courses/{title_slug}-{uuid}";
        const GITHUB_COURSE: &str = "{github}/blob/{branch}/courses/{item}";
        const COURSE_LABELS: [&str; 2] = ["content - course", "content proofreading"];
        const TUTORIAL_LABELS: [&str; 2] = ["content - tutorial", "content proofreading"];

        Self::new([
            IssueSpecTemplate::new(
                ContentKind::Course,
                "[PROOFREADING] {item} - {language}",
                "Course",
            )
            .lines(vec![
                BodyLine::always(&format!("en PBN version: {PBN_COURSE}")),
                BodyLine::always(&format!("en github version: {GITHUB_COURSE}/en.md")),
                BodyLine::non_english(&format!(
                    "{{language}} github version: {GITHUB_COURSE}/{{language}}.md"
                )),
            ])
            .labels(&COURSE_LABELS),
            IssueSpecTemplate::new(
                ContentKind::Tutorial,
                "[PROOFREADING] {category}/{name} - {language}",
                "Tutorial",
            )
            .lines(vec![
                BodyLine::always(
                    "en PBN version: {planb}/en/tutorials/{category}/{name}/{title_slug}-{uuid}",
                ),
                BodyLine::always(
                    "en github version: {github}/blob/{branch}/tutorials/{category}/{name}/en.md",
                ),
                BodyLine::non_english(
                    "{language} github version: {github}/blob/{branch}/tutorials/{category}/{name}/{language}.md",
                ),
            ])
            .labels(&TUTORIAL_LABELS),
            IssueSpecTemplate::new(
                ContentKind::TutorialSection,
                "[PROOFREADING] {section}_section - {language}",
                "Tutorial",
            )
            .lines(vec![
                BodyLine::always("English PBN Version: {planb}/en/tutorials/{section}"),
                BodyLine::always(
                    "Folder GitHub Version: {github}/blob/{branch}/tutorials/{section}",
                ),
            ])
            .labels(&TUTORIAL_LABELS),
            IssueSpecTemplate::new(
                ContentKind::VideoCourse,
                "[VIDEO-PROOFREADING] {item} - {language}",
                "Video Course",
            )
            .lines(vec![
                BodyLine::always(&format!("English PBN Version: {PBN_COURSE}")),
                BodyLine::always(&format!("EN GitHub Version: {GITHUB_COURSE}/en.md")),
                BodyLine::always(&format!(
                    "{{language}} GitHub Version: {GITHUB_COURSE}/{{language}}.md"
                )),
                BodyLine::always("Workspace link shared privately"),
            ])
            .labels(&[COURSE_LABELS[0], COURSE_LABELS[1], "video transcript"]),
            IssueSpecTemplate::new(
                ContentKind::ImageCourse,
                "[IMAGE-PROOFREADING] {item} - {language}",
                "Image Course",
            )
            .lines(vec![
                BodyLine::always(&format!("English PBN Version: {PBN_COURSE}")),
                BodyLine::always(&format!("EN GitHub Version: {GITHUB_COURSE}/assets/en/")),
                BodyLine::always("Workspace link shared privately"),
            ])
            .labels(&["content - course", "content - images"])
            .language_label("language - [{language}]"),
            IssueSpecTemplate::new(
                ContentKind::Weblate,
                "[PROOFREADING] weblate - {language}",
                "Weblate",
            )
            .lines(vec![BodyLine::always("Weblate Url: {weblate}/{language}/")])
            .labels(&["website translation"]),
        ])
    }

    /// Template for `kind`.
    pub fn get(&self, kind: ContentKind) -> Result<&IssueSpecTemplate> {
        self.templates.get(&kind).ok_or(Error::UnknownKind(kind))
    }

    /// All registered templates, ordered by kind.
    pub fn templates(&self) -> impl Iterator<Item = &IssueSpecTemplate> {
        self.templates.values()
    }

    /// Build the issue payload for `input`.
    ///
    /// Pure: equal inputs give equal payloads.
    pub fn derive(&self, kind: ContentKind, input: &ValidatedInput) -> Result<IssuePayload> {
        let template = self.get(kind)?;
        if template.requires_item && input.item.is_none() {
            return Err(Error::Template(format!("{kind} issue derived without an item")));
        }
        if template.requires_branch && input.branch.is_none() {
            return Err(Error::Template(format!("{kind} issue derived without a branch")));
        }

        let bindings = Bindings::for_input(input);
        let language = input.language.code.as_str();

        let title = bindings.render(&template.title_pattern)?;
        let body = template
            .body_line_templates
            .iter()
            .filter(|line| line.applies(language))
            .map(|line| bindings.render(&line.pattern))
            .collect::<Result<Vec<_>>>()?
            .join("\n");

        let mut labels: BTreeSet<String> = template.fixed_labels.iter().cloned().collect();
        labels.insert(bindings.render(&template.language_label_pattern)?);

        let project_fields = ProjectFields::from([
            (ProjectField::Status, template.status.clone()),
            (ProjectField::Language, language.to_string()),
            (ProjectField::Iteration, input.iteration.to_string()),
            (ProjectField::Urgency, input.urgency.to_string()),
            (ProjectField::ContentType, template.content_type.clone()),
        ]);

        Ok(IssuePayload {
            title,
            body,
            labels,
            project_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentItem, Iteration, Language, Urgency};

    fn input(kind: ContentKind, item: Option<ContentItem>, code: &str) -> ValidatedInput {
        ValidatedInput {
            kind,
            item,
            language: Language::new(code, code),
            branch: kind.requires_branch().then(|| "dev".to_string()),
            iteration: Iteration::First,
            urgency: Urgency::NotUrgent,
        }
    }

    fn course() -> ContentItem {
        ContentItem::course("btc101", "Bitcoin 101", "1234")
    }

    fn labels(payload: &IssuePayload) -> Vec<&str> {
        payload.labels.iter().map(String::as_str).collect()
    }

    #[test]
    fn course_issue() {
        let registry = TemplateRegistry::builtin();
        let payload = registry
            .derive(ContentKind::Course, &input(ContentKind::Course, Some(course()), "es"))
            .unwrap();

        assert_eq!(payload.title, "[PROOFREADING] btc101 - es");
        assert_eq!(
            payload.body,
            "en PBN version: https://planb.network/en/courses/bitcoin-101-1234\n\
             en github version: https://github.com/PlanB-Network/bitcoin-educational-content/blob/dev/courses/btc101/en.md\n\
             es github version: https://github.com/PlanB-Network/bitcoin-educational-content/blob/dev/courses/btc101/es.md"
        );
        assert_eq!(
            labels(&payload),
            vec!["content - course", "content proofreading", "language - es"]
        );
        assert_eq!(payload.field(ProjectField::Status), Some("Todo"));
        assert_eq!(payload.field(ProjectField::ContentType), Some("Course"));
        assert_eq!(payload.field(ProjectField::Iteration), Some("1st"));
        assert_eq!(payload.field(ProjectField::Urgency), Some("not urgent"));
    }

    #[test]
    fn english_course_has_two_lines() {
        let payload = TemplateRegistry::builtin()
            .derive(ContentKind::Course, &input(ContentKind::Course, Some(course()), "en"))
            .unwrap();
        assert_eq!(payload.body.lines().count(), 2);
        assert!(payload.body.ends_with("/courses/btc101/en.md"));
    }

    #[test]
    fn tutorial_issue() {
        let item = ContentItem::tutorial("wallet", "alby", "Alby Wallet", "u-9");
        let payload = TemplateRegistry::builtin()
            .derive(ContentKind::Tutorial, &input(ContentKind::Tutorial, Some(item), "fr"))
            .unwrap();
        assert_eq!(payload.title, "[PROOFREADING] wallet/alby - fr");
        assert!(payload
            .body
            .starts_with("en PBN version: https://planb.network/en/tutorials/wallet/alby/alby-wallet-u-9\n"));
        assert!(payload.body.ends_with("/blob/dev/tutorials/wallet/alby/fr.md"));
        assert_eq!(payload.field(ProjectField::ContentType), Some("Tutorial"));
        assert!(payload.labels.contains("content - tutorial"));
    }

    #[test]
    fn tutorial_section_issue() {
        let item = ContentItem::tutorial_section(vec!["wallet".into(), "mobile".into()]);
        let payload = TemplateRegistry::builtin()
            .derive(
                ContentKind::TutorialSection,
                &input(ContentKind::TutorialSection, Some(item), "de"),
            )
            .unwrap();
        assert_eq!(payload.title, "[PROOFREADING] wallet/mobile_section - de");
        assert_eq!(
            payload.body,
            "English PBN Version: https://planb.network/en/tutorials/wallet/mobile\n\
             Folder GitHub Version: https://github.com/PlanB-Network/bitcoin-educational-content/blob/dev/tutorials/wallet/mobile"
        );
    }

    #[test]
    fn video_course_scenario() {
        let payload = TemplateRegistry::builtin()
            .derive(
                ContentKind::VideoCourse,
                &input(ContentKind::VideoCourse, Some(course()), "es"),
            )
            .unwrap();
        assert_eq!(payload.title, "[VIDEO-PROOFREADING] btc101 - es");
        assert!(payload.labels.contains("video transcript"));
        assert!(payload.labels.contains("content - course"));
        assert_eq!(payload.field(ProjectField::ContentType), Some("Video Course"));
        assert!(payload.body.ends_with("\nWorkspace link shared privately"));
        assert!(payload.body.contains("es GitHub Version: "));
    }

    #[test]
    fn image_course_links_assets() {
        let payload = TemplateRegistry::builtin()
            .derive(
                ContentKind::ImageCourse,
                &input(ContentKind::ImageCourse, Some(course()), "it"),
            )
            .unwrap();
        assert_eq!(payload.title, "[IMAGE-PROOFREADING] btc101 - it");
        assert!(payload.body.contains("/blob/dev/courses/btc101/assets/en/\n"));
        assert_eq!(
            labels(&payload),
            vec!["content - course", "content - images", "language - [it]"]
        );
    }

    #[test]
    fn weblate_scenario() {
        let payload = TemplateRegistry::builtin()
            .derive(ContentKind::Weblate, &input(ContentKind::Weblate, None, "fr"))
            .unwrap();
        assert_eq!(payload.title, "[PROOFREADING] weblate - fr");
        assert_eq!(
            payload.body,
            "Weblate Url: https://weblate.planb.network/projects/planb-network-website/website-elements/fr/"
        );
        assert_eq!(labels(&payload), vec!["language - fr", "website translation"]);
        assert_eq!(payload.field(ProjectField::ContentType), Some("Weblate"));
    }

    #[test]
    fn derive_is_deterministic() {
        let registry = TemplateRegistry::builtin();
        for kind in ContentKind::ALL {
            let item = kind.requires_item().then(|| match kind {
                ContentKind::Tutorial => ContentItem::tutorial("a", "b", "T", "u"),
                ContentKind::TutorialSection => ContentItem::tutorial_section(vec!["a".into()]),
                _ => course(),
            });
            let input = input(kind, item, "pt");
            assert_eq!(
                registry.derive(kind, &input).unwrap(),
                registry.derive(kind, &input).unwrap()
            );
        }
    }

    #[test]
    fn every_template_uses_board_options() {
        let registry = TemplateRegistry::builtin();
        for kind in ContentKind::ALL {
            let template = registry.get(kind).unwrap();
            assert!(ProjectField::Status.validate_value(&template.status));
            assert!(ProjectField::ContentType.validate_value(&template.content_type));
            assert_eq!(template.requires_item, kind.requires_item());
        }
    }

    #[test]
    fn unknown_kind() {
        let registry = TemplateRegistry::new(Vec::new());
        let err = registry
            .derive(ContentKind::Weblate, &input(ContentKind::Weblate, None, "fr"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKind(ContentKind::Weblate)));
    }

    #[test]
    fn missing_metadata_is_template_error() {
        let bare = ContentItem::new(ContentKind::Course, "btc101".into(), "Bitcoin".into());
        let err = TemplateRegistry::builtin()
            .derive(ContentKind::Course, &input(ContentKind::Course, Some(bare), "es"))
            .unwrap_err();
        assert!(matches!(err, Error::Template(ref m) if m.contains("{title_slug}")));
        assert!(err.is_internal());
    }

    #[test]
    fn render_rejects_unclosed_braces() {
        let bindings = Bindings::default();
        assert!(matches!(bindings.render("{oops"), Err(Error::Template(_))));
        assert_eq!(bindings.render("no placeholders").unwrap(), "no placeholders");
    }
}
