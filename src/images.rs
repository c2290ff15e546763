//! Blocking image download and decode for fort photographs.

use std::time::Duration;

use image::GenericImageView;
use reqwest::blocking::Client;
use thiserror::Error;

/// Longest edge of a decoded image; larger images are shrunk.
pub const MAX_EDGE: u32 = 640;

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("image server responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded RGBA pixels ready for upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    /// Every request is bounded by `timeout`, connect included.
    pub fn new(timeout: Duration) -> Result<Self, ImageFetchError> {
        let client = Client::builder()
            .user_agent(concat!("heritage-explorer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ImageFetchError::HttpClient)?;
        Ok(Self { client })
    }

    pub fn fetch(&self, url: &str) -> Result<DecodedImage, ImageFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(ImageFetchError::Request)?;
        if !response.status().is_success() {
            return Err(ImageFetchError::Status(response.status()));
        }
        let bytes = response.bytes().map_err(ImageFetchError::Request)?;
        decode_image(&bytes)
    }
}

/// Decode an encoded image, shrinking it to fit [`MAX_EDGE`].
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ImageFetchError> {
    let mut dynamic = image::load_from_memory(bytes)?;
    let (width, height) = dynamic.dimensions();
    if width > MAX_EDGE || height > MAX_EDGE {
        dynamic = dynamic.thumbnail(MAX_EDGE, MAX_EDGE);
    }
    let rgba = dynamic.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
