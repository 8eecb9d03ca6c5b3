//! Menu catalog items and category filtering.

use serde::{Deserialize, Serialize};

/// A dish on the menu page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    /// Whole currency units.
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Category slug, e.g. `mains` or `desserts`.
    pub category: String,
}

/// Which categories the menu page is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuFilter {
    #[default]
    All,
    Category(String),
}

impl std::str::FromStr for MenuFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "all" {
            Self::All
        } else {
            Self::Category(s.to_owned())
        })
    }
}

/// Items and categories left visible by a [`MenuFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSelection<'a> {
    /// Visible items in catalog order.
    pub items: Vec<&'a MenuItem>,
    /// Categories with at least one visible item, in first-seen order.
    pub categories: Vec<&'a str>,
}

impl MenuFilter {
    /// Whether `item` passes this filter.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => item.category == *category,
        }
    }

    /// Apply the filter to a catalog.
    ///
    /// Categories whose items are all hidden are left out of the selection.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a [MenuItem]) -> MenuSelection<'a> {
        let items: Vec<&MenuItem> = catalog.iter().filter(|item| self.matches(item)).collect();

        let mut categories: Vec<&str> = Vec::new();
        for item in &items {
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }

        MenuSelection { items, categories }
    }
}
