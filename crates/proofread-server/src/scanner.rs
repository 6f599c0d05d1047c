//! Filesystem scanner for a local clone of the content repository.
//!
//! Layout read:
//!
//! ```text
//! courses/<id>/course.yml              id: <uuid>, name: <title>
//! courses/<id>/en.md                   "# Title" on the first line
//! tutorials/<category>/<name>/tutorial.yml
//! tutorials/<category>/<name>/en.md    optional front matter, then "# Title"
//! ```
//!
//! Every directory under `tutorials/` that holds tutorials, at any depth,
//! is also a tutorial section.

use crate::error::{Result, ServerError};
use proofread_core::{Catalog, ContentItem};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Fields read from `course.yml` and `tutorial.yml`.
#[derive(Debug, Default, Deserialize)]
struct Descriptor {
    /// Website UUID
    #[serde(default)]
    id: Option<serde_yaml::Value>,
    #[serde(default)]
    name: Option<serde_yaml::Value>,
}

/// Scalar YAML value as text; YAML reads unquoted `1234` as a number.
fn scalar(value: Option<serde_yaml::Value>) -> Option<String> {
    let text = match value? {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Check that `path` looks like a clone of the content repository.
pub fn validate_repo_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ServerError::Config("repository path cannot be empty".to_string()));
    }
    if !path.exists() {
        return Err(ServerError::Config(format!(
            "repository path {} does not exist",
            path.display()
        )));
    }
    for required in ["courses", "tutorials"] {
        if !path.join(required).is_dir() {
            return Err(ServerError::Config(format!(
                "no '{required}' directory found in {}",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Scan the repository at `root` into a catalog with the default languages.
pub fn load_catalog(root: &Path) -> Result<Catalog> {
    Ok(Catalog::with_default_languages(scan_repository(root)?))
}

/// Every course, tutorial and tutorial section under `root`, sorted by id
/// within each kind.
pub fn scan_repository(root: &Path) -> Result<Vec<ContentItem>> {
    validate_repo_path(root).map_err(|e| ServerError::Repository(e.to_string()))?;

    let mut items = scan_courses(&root.join("courses"))?;
    items.extend(scan_tutorials(&root.join("tutorials"))?);
    items.extend(scan_sections(&root.join("tutorials"))?);

    tracing::debug!(root = %root.display(), items = items.len(), "repository scanned");
    Ok(items)
}

/// Visible subdirectories of `dir`, sorted by name.
fn subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        dirs.push((name, entry.path()));
    }
    dirs.sort();
    Ok(dirs)
}

/// Like [`subdirs`] for directories below the repository roots: one that
/// cannot be read is logged and treated as empty.
fn readable_subdirs(dir: &Path) -> Vec<(String, PathBuf)> {
    subdirs(dir).unwrap_or_else(|e| {
        tracing::warn!(dir = %dir.display(), error = %e, "unreadable directory, skipping");
        Vec::new()
    })
}

fn read_descriptor(path: &Path) -> Result<Descriptor> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Descriptor::default());
    }
    Ok(serde_yaml::from_str(&text)?)
}

/// Title from the first line of a markdown file, after any front matter.
pub fn markdown_title(content: &str) -> Option<String> {
    let mut text = content.trim_start();
    if let Some(rest) = text.strip_prefix("---") {
        let end = rest.find("\n---")?;
        text = rest[end + 4..].trim_start();
    }
    let line = text.lines().next()?;
    let title = line.trim_start_matches('#');
    if title.len() == line.len() || !title.starts_with(char::is_whitespace) {
        return None;
    }
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn title_from(dir: &Path) -> Option<String> {
    fs::read_to_string(dir.join("en.md"))
        .ok()
        .and_then(|content| markdown_title(&content))
}

/// `"lightning-network"` to `"Lightning Network"`.
fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn scan_courses(courses: &Path) -> Result<Vec<ContentItem>> {
    let mut items = Vec::new();
    for (id, dir) in subdirs(courses)? {
        let yml = dir.join("course.yml");
        if !yml.is_file() {
            continue;
        }
        let descriptor = match read_descriptor(&yml) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(course = %id, error = %e, "unreadable course.yml, skipping course");
                continue;
            }
        };
        let Some(uuid) = scalar(descriptor.id) else {
            tracing::warn!(course = %id, "course.yml has no id, skipping course");
            continue;
        };
        let title = title_from(&dir)
            .or_else(|| scalar(descriptor.name))
            .unwrap_or_else(|| id.clone());
        items.push(ContentItem::course(&id, &title, &uuid));
    }
    Ok(items)
}

fn scan_tutorials(tutorials: &Path) -> Result<Vec<ContentItem>> {
    let mut items = Vec::new();
    for (category, category_dir) in subdirs(tutorials)? {
        for (name, dir) in readable_subdirs(&category_dir) {
            let yml = dir.join("tutorial.yml");
            if !yml.is_file() {
                continue;
            }
            let descriptor = match read_descriptor(&yml) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(tutorial = %format!("{category}/{name}"), error = %e, "unreadable tutorial.yml, skipping tutorial");
                    continue;
                }
            };
            let Some(uuid) = scalar(descriptor.id) else {
                tracing::warn!(tutorial = %format!("{category}/{name}"), "tutorial.yml has no id, skipping tutorial");
                continue;
            };
            let title = title_from(&dir).unwrap_or_else(|| title_case(&name));
            items.push(ContentItem::tutorial(&category, &name, &title, &uuid));
        }
    }
    items.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(items)
}

/// Push a section for every directory below `dir` holding tutorials.
/// Returns whether `dir` holds any tutorial.
fn collect_sections(dir: &Path, segments: &[String], out: &mut Vec<ContentItem>) -> bool {
    let mut holds_tutorials = false;
    for (name, child) in readable_subdirs(dir) {
        if child.join("tutorial.yml").is_file() {
            holds_tutorials = true;
            continue;
        }
        let mut path = segments.to_vec();
        path.push(name);
        if collect_sections(&child, &path, out) {
            out.push(ContentItem::tutorial_section(path));
            holds_tutorials = true;
        }
    }
    holds_tutorials
}

fn scan_sections(tutorials: &Path) -> Result<Vec<ContentItem>> {
    let mut items = Vec::new();
    collect_sections(tutorials, &[], &mut items);
    items.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(items)
}
