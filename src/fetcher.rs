use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::error::{CatalogError, ImageError};

/// Source of image bytes, keyed by URL.
///
/// Any `Fn(&str) -> Result<Vec<u8>, ImageError>` closure is a fetcher, which
/// keeps tests free of network access.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

impl<F> ImageFetcher for F
where
    F: Fn(&str) -> Result<Vec<u8>, ImageError>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        self(url)
    }
}

pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self, CatalogError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
            return Err(ImageError::Status(status.as_u16()));
        }

        let bytes = response.bytes()?;
        Ok(bytes.to_vec())
    }
}
