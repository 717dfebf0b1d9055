#![forbid(unsafe_code)]

//! The closed set of prompt categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prompt category. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Web Design")]
    WebDesign,
    #[serde(rename = "Web Programming")]
    WebProgramming,
    #[serde(rename = "Shaders")]
    Shaders,
    #[serde(rename = "Python Programming")]
    Python,
    #[serde(rename = "JavaScript")]
    JavaScript,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Game Development")]
    GameDev,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Mobile Apps")]
    MobileApps,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "DevOps")]
    DevOps,
    #[serde(rename = "AI Tools")]
    AiTools,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 12] = [
        Self::WebDesign,
        Self::WebProgramming,
        Self::Shaders,
        Self::Python,
        Self::JavaScript,
        Self::MachineLearning,
        Self::GameDev,
        Self::DataScience,
        Self::MobileApps,
        Self::Cybersecurity,
        Self::DevOps,
        Self::AiTools,
    ];

    /// Human-readable name, also the serialized form.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::WebDesign => "Web Design",
            Self::WebProgramming => "Web Programming",
            Self::Shaders => "Shaders",
            Self::Python => "Python Programming",
            Self::JavaScript => "JavaScript",
            Self::MachineLearning => "Machine Learning",
            Self::GameDev => "Game Development",
            Self::DataScience => "Data Science",
            Self::MobileApps => "Mobile Apps",
            Self::Cybersecurity => "Cybersecurity",
            Self::DevOps => "DevOps",
            Self::AiTools => "AI Tools",
        }
    }

    /// Directory-style name: lowercase, whitespace replaced by `_`.
    #[must_use]
    pub fn slug(self) -> String {
        self.display_name()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Upper-case label used in headers and cards.
    #[must_use]
    pub fn label(self) -> String {
        self.display_name().to_uppercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error from parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.display_name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category selection: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Whether a record in `category` passes this filter.
    #[must_use]
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == category,
        }
    }

    /// Header label: `ROOT_ACCESS` for all, otherwise the category label.
    #[must_use]
    pub fn header_label(self) -> String {
        match self {
            Self::All => "ROOT_ACCESS".to_string(),
            Self::Only(c) => c.label(),
        }
    }

    /// Text shown after the typed header.
    #[must_use]
    pub const fn header_suffix(self) -> &'static str {
        match self {
            Self::All => " // FULL_ACCESS_GRANTED",
            Self::Only(_) => " // SUB_DIRECTORY_MOUNTED",
        }
    }

    /// Sidebar entry name.
    #[must_use]
    pub fn directory_name(self) -> String {
        match self {
            Self::All => "./all_files".to_string(),
            Self::Only(c) => c.slug(),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(c: Category) -> Self {
        Self::Only(c)
    }
}
