pub mod config;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod model;
pub mod navigator;
pub mod session;
pub mod terminal;

use std::path::Path;

use log::warn;

pub use crate::config::NavigatorConfig;
pub use error::{CatalogError, ImageError};
pub use fetcher::{HttpImageFetcher, ImageFetcher};
pub use loader::{load_recipes, parse_recipes, LoadReport, SkippedRecord};
pub use model::{format_time, parse_minutes, ImageRef, ImageResolution, RawRecipe, Recipe};
pub use navigator::{max_page_index, CatalogNavigator, DEFAULT_PAGE_SIZE};
pub use session::{
    download_progress_bar, Action, BrowseSession, BrowseSessionBuilder, ImageFailure, PageDisplay,
    PageView,
};

/// Load a recipe feed and build a navigator over the recipes that parsed.
///
/// Skipped records are logged; use [`load_recipes`] to inspect them.
pub fn open_catalog(
    path: impl AsRef<Path>,
    page_size: usize,
) -> Result<CatalogNavigator, CatalogError> {
    let report = load_recipes(path)?;
    if !report.skipped.is_empty() {
        warn!("{} malformed recipes were left out", report.skipped.len());
    }
    CatalogNavigator::new(report.recipes, page_size)
}
