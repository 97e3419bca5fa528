//! Shared fixtures for the provider integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image_generation_client::{ArtifactResolver, PollPolicy, Poller, TokioSleeper};

/// A tiny valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 120, 200]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

pub fn png_base64() -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(png_bytes())
}

/// Poller without real delays.
pub fn fast_poller(max_attempts: u32) -> Poller {
    Poller::new(
        PollPolicy::new(max_attempts, Duration::ZERO),
        Arc::new(TokioSleeper),
    )
}

pub fn resolver() -> ArtifactResolver {
    ArtifactResolver::new(reqwest::Client::new())
}
