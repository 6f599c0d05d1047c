//! Content kind discriminator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of content being proofread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Course,
    Tutorial,
    TutorialSection,
    VideoCourse,
    ImageCourse,
    Weblate,
}

/// Which scanned listing a kind resolves its items against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    Courses,
    Tutorials,
    TutorialSections,
}

impl ContentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Course,
        ContentKind::Tutorial,
        ContentKind::TutorialSection,
        ContentKind::VideoCourse,
        ContentKind::ImageCourse,
        ContentKind::Weblate,
    ];

    /// Wire name of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Course => "course",
            ContentKind::Tutorial => "tutorial",
            ContentKind::TutorialSection => "tutorial_section",
            ContentKind::VideoCourse => "video_course",
            ContentKind::ImageCourse => "image_course",
            ContentKind::Weblate => "weblate",
        }
    }

    /// The listing holding this kind's items. Video and image course issues
    /// are filed against regular courses; Weblate has no item at all.
    pub const fn listing(&self) -> Option<Listing> {
        match self {
            ContentKind::Course | ContentKind::VideoCourse | ContentKind::ImageCourse => {
                Some(Listing::Courses)
            }
            ContentKind::Tutorial => Some(Listing::Tutorials),
            ContentKind::TutorialSection => Some(Listing::TutorialSections),
            ContentKind::Weblate => None,
        }
    }

    /// Whether an issue of this kind points at a catalog item.
    pub const fn requires_item(&self) -> bool {
        self.listing().is_some()
    }

    /// Whether an issue of this kind links into a repository branch.
    pub const fn requires_branch(&self) -> bool {
        !matches!(self, ContentKind::Weblate)
    }

    /// Human noun for the item, used in error messages.
    pub const fn item_noun(&self) -> &'static str {
        match self.listing() {
            Some(Listing::Courses) => "course",
            Some(Listing::Tutorials) => "tutorial",
            Some(Listing::TutorialSections) => "tutorial section",
            None => "item",
        }
    }
}

impl Listing {
    /// The kind items of this listing are stored under.
    pub const fn kind(&self) -> ContentKind {
        match self {
            Listing::Courses => ContentKind::Course,
            Listing::Tutorials => ContentKind::Tutorial,
            Listing::TutorialSections => ContentKind::TutorialSection,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| format!("unknown content kind '{s}'"))
    }
}
