use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Deserializer};

use crate::error::ImageError;
use crate::fetcher::ImageFetcher;

/// A recipe record as it appears in the JSON feed.
///
/// Every field is required; a record missing one is rejected by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipe {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "recipeYield", deserialize_with = "yield_as_text")]
    pub recipe_yield: String,
    #[serde(rename = "cookTime")]
    pub cook_time: String,
    #[serde(rename = "prepTime")]
    pub prep_time: String,
    pub ingredients: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YieldType {
    String(String),
    Number(serde_json::Number),
}

fn yield_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match YieldType::deserialize(deserializer)? {
        YieldType::String(text) => text,
        YieldType::Number(number) => number.to_string(),
    })
}

/// Where a recipe's picture lives: still on the network, or already on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Remote(String),
    Local(PathBuf),
}

impl ImageRef {
    /// Classify a reference from the feed. Only `http://` and `https://`
    /// references are downloadable; anything else is taken as a local path.
    pub fn parse(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        let scheme = reference
            .get(..8)
            .unwrap_or(reference.as_str())
            .to_ascii_lowercase();
        if scheme.starts_with("http://") || scheme.starts_with("https://") {
            ImageRef::Remote(reference)
        } else {
            ImageRef::Local(PathBuf::from(reference))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Remote(_))
    }

    pub fn remote_url(&self) -> Option<&str> {
        match self {
            ImageRef::Remote(url) => Some(url),
            ImageRef::Local(_) => None,
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            ImageRef::Remote(_) => None,
            ImageRef::Local(path) => Some(path),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Remote(url) => f.write_str(url),
            ImageRef::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of a successful [`Recipe::resolve_image`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResolution {
    /// The image was downloaded and written to this path
    Downloaded(PathBuf),
    /// The reference was already local; nothing was fetched
    AlreadyLocal,
}

/// One dish, normalized from a [`RawRecipe`].
#[derive(Debug, Clone)]
pub struct Recipe {
    name: String,
    cook_minutes: u64,
    prep_minutes: u64,
    recipe_yield: String,
    ingredients: Vec<String>,
    description: String,
    image: ImageRef,
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        Recipe {
            name: raw.name,
            cook_minutes: parse_minutes(&raw.cook_time),
            prep_minutes: parse_minutes(&raw.prep_time),
            recipe_yield: raw.recipe_yield,
            ingredients: raw.ingredients,
            description: raw.description,
            image: ImageRef::parse(raw.image),
        }
    }
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cook_minutes(&self) -> u64 {
        self.cook_minutes
    }

    pub fn prep_minutes(&self) -> u64 {
        self.prep_minutes
    }

    /// Cook time as `HH:MM`
    pub fn cook_time(&self) -> String {
        format_time(self.cook_minutes)
    }

    /// Prep time as `HH:MM`
    pub fn prep_time(&self) -> String {
        format_time(self.prep_minutes)
    }

    pub fn recipe_yield(&self) -> &str {
        &self.recipe_yield
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Case-insensitive substring match against name, description and
    /// every ingredient. `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(needle))
    }

    /// Download the recipe image into `image_dir` if it is still remote.
    ///
    /// The file is named after the last segment of the URL path. On any
    /// failure the image reference is left untouched and the error is
    /// returned so the caller can show a placeholder.
    pub fn resolve_image<F>(
        &mut self,
        fetcher: &F,
        image_dir: &Path,
    ) -> Result<ImageResolution, ImageError>
    where
        F: ImageFetcher + ?Sized,
    {
        let url = match &self.image {
            ImageRef::Remote(url) => url.clone(),
            ImageRef::Local(_) => return Ok(ImageResolution::AlreadyLocal),
        };

        let file_name =
            file_name_from_url(&url).ok_or_else(|| ImageError::NoFileName(url.clone()))?;
        let bytes = fetcher.fetch(&url)?;

        let path = image_dir.join(file_name);
        fs::write(&path, &bytes)?;
        debug!("Saved {} bytes from {} to {}", bytes.len(), url, path.display());

        self.image = ImageRef::Local(path.clone());
        Ok(ImageResolution::Downloaded(path))
    }
}

/// Parse a `PT<N>M` duration into minutes.
///
/// Only the minutes-only form is recognized and only at the start of the
/// string; anything else, including `PT1H30M`, yields 0.
pub fn parse_minutes(duration: &str) -> u64 {
    let Some(rest) = duration.strip_prefix("PT") else {
        return 0;
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 || !rest[digits_end..].starts_with('M') {
        return 0;
    }
    rest[..digits_end].parse().unwrap_or(0)
}

/// Format minutes as `HH:MM`. Hours are padded to two digits but never
/// truncated.
pub fn format_time(minutes: u64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let name = parsed.path_segments()?.last()?;
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
