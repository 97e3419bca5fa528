//! `imagebot generate`: run the configured generator once and write the images to disk.

use anyhow::{Context, Result};
use image_generation_client::{GenerationRequest, ImageGenerator};
use std::path::{Path, PathBuf};
use tracing::info;

/// Generates images for `request` and saves them under `out` as `image-N.<ext>`. Returns the written paths.
pub async fn generate_to_dir(
    generator: &dyn ImageGenerator,
    request: &GenerationRequest,
    out: &Path,
) -> Result<Vec<PathBuf>> {
    let images = generator
        .generate_image(request)
        .await
        .with_context(|| format!("Generate images with {}", generator.provider_name()))?;

    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Create output directory {}", out.display()))?;

    let mut written = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let path = out.join(image.file_name(index));
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("Write {}", path.display()))?;
        info!(path = %path.display(), width = image.width, height = image.height, "Image saved");
        written.push(path);
    }
    Ok(written)
}
