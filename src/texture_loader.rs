use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use raylib::prelude::*;

// Imported media is already orientation-normalized JPEG, so loading is a
// straight bytes -> Image -> GPU texture hop. The extension hint is what
// raylib uses to pick a decoder for in-memory data.
pub fn load_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("failed to read {}", image_path.display()))?;
    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("jpg")
        .to_lowercase();

    let image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {}", image_path.display(), e))?;
    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {}", image_path.display(), e))?;
    drop(image);

    Ok(texture)
}
