//! Menu catalog commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the whole menu
//! althawqa menu list
//!
//! # Show one category from a custom catalog
//! althawqa menu list --category desserts --file ./menu.yaml
//! ```

use std::path::Path;

use althawqa_core::{CurrencyCode, MenuFilter, MenuItem, Price};

use super::CommandError;

/// Catalog compiled into the binary, used when no file is given.
const DEFAULT_MENU: &str = include_str!("../../menu.yaml");

/// Load the catalog from `file`, or the built-in one.
///
/// # Errors
///
/// Returns `CommandError::MenuFile` if the file cannot be read and
/// `CommandError::MenuParse` if it is not a YAML list of dishes.
pub fn load_catalog(file: Option<&Path>) -> Result<Vec<MenuItem>, CommandError> {
    let items: Vec<MenuItem> = match file {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|source| CommandError::MenuFile {
                    path: path.display().to_string(),
                    source,
                })?;
            serde_yaml::from_str(&content)?
        }
        None => serde_yaml::from_str(DEFAULT_MENU)?,
    };

    tracing::debug!(items = items.len(), "Menu catalog loaded");
    Ok(items)
}

/// Find a dish by exact name.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if no dish has that name.
pub fn find_item<'a>(catalog: &'a [MenuItem], name: &str) -> Result<&'a MenuItem, CommandError> {
    catalog
        .iter()
        .find(|item| item.name == name)
        .ok_or_else(|| CommandError::UnknownItem(name.to_owned()))
}

/// Print the dishes passing `category`, grouped by category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn list(
    file: Option<&Path>,
    category: &str,
    currency: CurrencyCode,
) -> Result<(), CommandError> {
    let catalog = load_catalog(file)?;
    let Ok(filter) = category.parse::<MenuFilter>();
    let selection = filter.apply(&catalog);

    if selection.items.is_empty() {
        println!("No dishes in category {category:?}");
        return Ok(());
    }

    for category in &selection.categories {
        println!("{category}");
        for item in selection.items.iter().filter(|i| i.category == *category) {
            println!(
                "  {:<24} {:>10}  {}",
                item.name,
                Price::new(item.price, currency).display(),
                item.description
            );
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(find_item(&catalog, "Chicken Kabsa").unwrap().price, 55);
    }

    #[test]
    fn test_unknown_item() {
        let catalog = load_catalog(None).unwrap();
        assert!(matches!(
            find_item(&catalog, "Sushi"),
            Err(CommandError::UnknownItem(name)) if name == "Sushi"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_catalog(Some(Path::new("/nonexistent/menu.yaml")));
        assert!(matches!(result, Err(CommandError::MenuFile { .. })));
    }
}
