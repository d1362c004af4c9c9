use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::config::NavigatorConfig;
use crate::error::{CatalogError, ImageError};
use crate::fetcher::ImageFetcher;
use crate::model::{ImageResolution, Recipe};
use crate::navigator::{CatalogNavigator, DEFAULT_PAGE_SIZE};

/// A user action forwarded to the navigator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    First,
    Last,
    Search(String),
    Reset,
}

/// An image that could not be downloaded during a render
#[derive(Debug)]
pub struct ImageFailure {
    pub catalog_index: usize,
    pub url: String,
    pub error: ImageError,
}

/// Everything a display needs to draw the current page
#[derive(Debug)]
pub struct PageView<'a> {
    /// Visible recipes paired with their position in the full catalog
    pub entries: Vec<(usize, &'a Recipe)>,
    pub has_next: bool,
    pub has_previous: bool,
    /// 1-based ordinal of the first entry within the active view, 0 if empty
    pub first_ordinal: usize,
    /// 1-based page number
    pub page_number: usize,
    pub page_count: usize,
    pub active_len: usize,
    pub total_len: usize,
    pub keyword: Option<&'a str>,
    /// Downloads that failed while preparing this page
    pub image_failures: &'a [ImageFailure],
}

/// Receives the page after every navigator operation.
///
/// Any `FnMut(&PageView)` closure is a display.
pub trait PageDisplay {
    fn render(&mut self, view: &PageView<'_>);
}

impl<F> PageDisplay for F
where
    F: FnMut(&PageView<'_>),
{
    fn render(&mut self, view: &PageView<'_>) {
        self(view)
    }
}

/// Creates the progress bar for one batch of downloads, given its length
type ProgressFactory = Box<dyn Fn(u64) -> ProgressBar>;

/// ASCII progress bar on stderr, one tick per attempted download
pub fn download_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("[{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

/// A navigator wired to an image fetcher and a display.
///
/// Images are downloaded lazily, only for recipes on the page being shown,
/// and each recipe is attempted at most once.
pub struct BrowseSession {
    navigator: CatalogNavigator,
    fetcher: Box<dyn ImageFetcher>,
    display: Box<dyn PageDisplay>,
    progress: ProgressFactory,
    image_dir: PathBuf,
    attempted: Vec<bool>,
    failures: Vec<ImageFailure>,
    /// Saved image files and the URL each one was downloaded from
    saved_from: HashMap<PathBuf, String>,
}

impl BrowseSession {
    /// Creates a new builder for a browsing session
    ///
    /// # Example
    /// ```
    /// use recipe_navigator::{BrowseSession, ImageError, PageView};
    ///
    /// let session = BrowseSession::builder()
    ///     .recipes(Vec::new())
    ///     .page_size(4)
    ///     .fetcher(|_url: &str| -> Result<Vec<u8>, ImageError> { Err(ImageError::Status(404)) })
    ///     .display(|view: &PageView<'_>| println!("{} recipes", view.active_len))
    ///     .build();
    /// assert!(session.is_ok());
    /// ```
    pub fn builder() -> BrowseSessionBuilder {
        BrowseSessionBuilder::default()
    }

    /// Render the first page
    pub fn start(&mut self) {
        self.refresh();
    }

    /// Apply a user action and redraw. Returns `true` if the active view,
    /// the page or the search keyword changed.
    pub fn apply(&mut self, action: Action) -> bool {
        debug!("Applying {:?}", action);
        let changed = match action {
            Action::Next => self.navigator.next_page(),
            Action::Previous => self.navigator.previous_page(),
            Action::First => self.navigator.first_page(),
            Action::Last => self.navigator.last_page(),
            Action::Search(keyword) => {
                changes_view(&mut self.navigator, |navigator| navigator.search(&keyword))
            }
            Action::Reset => changes_view(&mut self.navigator, CatalogNavigator::reset),
        };
        self.refresh();
        changed
    }

    pub fn navigator(&self) -> &CatalogNavigator {
        &self.navigator
    }

    /// Look up a recipe by its catalog index
    pub fn recipe(&self, catalog_index: usize) -> Option<&Recipe> {
        self.navigator.recipe(catalog_index)
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    fn refresh(&mut self) {
        self.resolve_visible_images();

        let navigator = &self.navigator;
        let view = PageView {
            entries: navigator
                .visible_indices()
                .iter()
                .filter_map(|&index| navigator.recipe(index).map(|recipe| (index, recipe)))
                .collect(),
            has_next: navigator.has_next(),
            has_previous: navigator.has_previous(),
            first_ordinal: navigator.first_item_ordinal(),
            page_number: navigator.page_index() + 1,
            page_count: navigator.page_count(),
            active_len: navigator.active_len(),
            total_len: navigator.total_len(),
            keyword: navigator.keyword(),
            image_failures: &self.failures,
        };
        self.display.render(&view);
    }

    fn resolve_visible_images(&mut self) {
        self.failures.clear();
        let total = self.navigator.total_len();

        let mut pending = Vec::new();
        for &index in self.navigator.visible_indices() {
            if self.attempted[index] {
                continue;
            }
            self.attempted[index] = true;
            let url = self
                .navigator
                .recipe(index)
                .and_then(|recipe| recipe.image().remote_url());
            if let Some(url) = url {
                pending.push((index, url.to_string()));
            }
        }
        if pending.is_empty() {
            return;
        }

        let bar = (self.progress)(pending.len() as u64);
        for (index, url) in pending {
            let Some(recipe) = self.navigator.recipe_mut(index) else {
                continue;
            };

            let label = format!("Downloading image {} of {}", index + 1, total);
            info!("{}", label);
            bar.set_message(label);

            match recipe.resolve_image(self.fetcher.as_ref(), &self.image_dir) {
                Ok(ImageResolution::Downloaded(path)) => {
                    debug!("Image for {:?} saved to {}", recipe.name(), path.display());
                    if let Some(previous) = self.saved_from.insert(path.clone(), url.clone()) {
                        if previous != url {
                            warn!(
                                "Image {} for recipe #{} overwrote {}, previously saved from {}",
                                url,
                                index + 1,
                                path.display(),
                                previous
                            );
                        }
                    }
                }
                Ok(ImageResolution::AlreadyLocal) => {}
                Err(error) => {
                    warn!("Error while downloading image {}: {}", url, error);
                    self.failures.push(ImageFailure {
                        catalog_index: index,
                        url,
                        error,
                    });
                }
            }
            bar.inc(1);
        }
        bar.finish();
    }
}

/// Run a search or reset and report whether the view, page or keyword moved
fn changes_view(
    navigator: &mut CatalogNavigator,
    operation: impl FnOnce(&mut CatalogNavigator),
) -> bool {
    let before = (
        navigator.active_view().to_vec(),
        navigator.page_index(),
        navigator.keyword().map(str::to_string),
    );
    operation(navigator);
    before.0 != navigator.active_view()
        || before.1 != navigator.page_index()
        || before.2.as_deref() != navigator.keyword()
}

/// Builder for configuring a [`BrowseSession`]
#[derive(Default)]
pub struct BrowseSessionBuilder {
    recipes: Vec<Recipe>,
    page_size: Option<usize>,
    image_dir: Option<PathBuf>,
    fetcher: Option<Box<dyn ImageFetcher>>,
    display: Option<Box<dyn PageDisplay>>,
    progress: Option<ProgressFactory>,
}

impl BrowseSessionBuilder {
    pub fn recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = recipes;
        self
    }

    /// Set the number of recipes per page (default 4)
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the directory images are downloaded into (default `.`)
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Take page size and image directory from a loaded configuration
    pub fn config(mut self, config: &NavigatorConfig) -> Self {
        self.page_size = Some(config.page_size);
        self.image_dir = Some(config.image_dir.clone());
        self
    }

    pub fn fetcher(mut self, fetcher: impl ImageFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn display(mut self, display: impl PageDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Replace the download progress bar (default: [`download_progress_bar`]).
    /// The factory receives the number of downloads in the batch.
    pub fn progress(mut self, factory: impl Fn(u64) -> ProgressBar + 'static) -> Self {
        self.progress = Some(Box::new(factory));
        self
    }

    /// Build the session. Nothing is rendered until [`BrowseSession::start`].
    ///
    /// # Errors
    /// Returns `CatalogError` if:
    /// - the page size is zero
    /// - no fetcher or no display was given
    /// - the image directory does not exist and cannot be created
    pub fn build(self) -> Result<BrowseSession, CatalogError> {
        let fetcher = self.fetcher.ok_or_else(|| {
            CatalogError::BuilderError("No image fetcher specified. Use .fetcher()".to_string())
        })?;
        let display = self.display.ok_or_else(|| {
            CatalogError::BuilderError("No display specified. Use .display()".to_string())
        })?;

        let navigator =
            CatalogNavigator::new(self.recipes, self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))?;
        let attempted = vec![false; navigator.total_len()];

        let image_dir = self.image_dir.unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&image_dir)?;

        let progress: ProgressFactory = match self.progress {
            Some(factory) => factory,
            None => Box::new(download_progress_bar),
        };

        Ok(BrowseSession {
            navigator,
            fetcher,
            display,
            progress,
            image_dir,
            attempted,
            failures: Vec::new(),
            saved_from: HashMap::new(),
        })
    }
}
