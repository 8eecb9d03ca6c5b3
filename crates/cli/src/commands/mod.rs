//! Subcommand implementations.

pub mod cart;
pub mod forms;
pub mod menu;
pub mod session;

use std::sync::Arc;

use thiserror::Error;

use althawqa_storefront::config::StorefrontConfig;
use althawqa_storefront::error::AppError;
use althawqa_storefront::storage::{FileStore, KeyValueStore};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Menu catalog could not be read.
    #[error("Cannot read menu file {path}: {source}")]
    MenuFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Menu catalog is not valid YAML.
    #[error("Invalid menu catalog: {0}")]
    MenuParse(#[from] serde_yaml::Error),

    /// No dish with this name on the menu.
    #[error("No menu item named {0:?}")]
    UnknownItem(String),

    /// The form was rejected or could not be sent.
    #[error("{0}")]
    NotSubmitted(&'static str),
}

/// The file-backed store configured for this machine.
pub fn open_storage(config: &StorefrontConfig) -> Arc<dyn KeyValueStore> {
    tracing::debug!(path = %config.storage_path.display(), "Using file storage");
    Arc::new(FileStore::new(config.storage_path.clone()))
}
