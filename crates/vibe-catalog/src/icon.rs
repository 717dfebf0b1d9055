#![forbid(unsafe_code)]

//! Category iconography.

use std::collections::HashMap;

use crate::category::Category;

/// Icon identifiers. [`Icon::Hash`] is the fallback for unknown names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Monitor,
    Globe,
    Disc,
    Terminal,
    Code,
    Cpu,
    Zap,
    Activity,
    Smartphone,
    Shield,
    Layers,
    Box,
    Hash,
}

impl Icon {
    /// Single-column glyph for terminal display.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Monitor => '▣',
            Self::Globe => '◍',
            Self::Disc => '◉',
            Self::Terminal => '❯',
            Self::Code => 'λ',
            Self::Cpu => '▦',
            Self::Zap => 'ϟ',
            Self::Activity => '∿',
            Self::Smartphone => '▯',
            Self::Shield => '◆',
            Self::Layers => '≡',
            Self::Box => '■',
            Self::Hash => '#',
        }
    }

    /// Icon for a category.
    #[must_use]
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::WebDesign => Self::Monitor,
            Category::WebProgramming => Self::Globe,
            Category::Shaders => Self::Disc,
            Category::Python => Self::Terminal,
            Category::JavaScript => Self::Code,
            Category::MachineLearning => Self::Cpu,
            Category::GameDev => Self::Zap,
            Category::DataScience => Self::Activity,
            Category::MobileApps => Self::Smartphone,
            Category::Cybersecurity => Self::Shield,
            Category::DevOps => Self::Layers,
            Category::AiTools => Self::Box,
        }
    }
}

/// Lookup from category display name to icon, with a default.
#[derive(Debug, Clone)]
pub struct IconMap {
    by_name: HashMap<&'static str, Icon>,
}

impl IconMap {
    /// Build the table from every category.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if two categories share a display name, which
    /// would leave one of them unreachable by name.
    #[must_use]
    pub fn new() -> Self {
        let by_name: HashMap<_, _> = Category::ALL
            .into_iter()
            .map(|c| (c.display_name(), Icon::for_category(c)))
            .collect();
        debug_assert_eq!(by_name.len(), Category::ALL.len(), "icon table incomplete");
        Self { by_name }
    }

    /// Icon for a category display name; [`Icon::Hash`] if unknown.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Icon {
        self.by_name.get(name).copied().unwrap_or(Icon::Hash)
    }

    /// Icon for a known category.
    #[must_use]
    pub fn get(&self, category: Category) -> Icon {
        Icon::for_category(category)
    }

    /// Number of categories covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for IconMap {
    fn default() -> Self {
        Self::new()
    }
}
