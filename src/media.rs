use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use exif::{In, Tag, Value};
use image::imageops::FilterType;
use log::debug;

use crate::constants::MAX_PHOTO_EDGE;

// Local stand-in for the cloud media bucket: every invitation owns the
// namespace media/<id>/ under the storage root, and photos become publicly
// servable files under stable names.
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn namespace_dir(&self, id: &str) -> PathBuf {
        self.root.join("media").join(id)
    }

    // Copies photos into the namespace in the given order, normalizing EXIF
    // orientation and downscaling anything over MAX_PHOTO_EDGE before the
    // JPEG re-encode. Returns root-relative paths in display order.
    pub fn import_photos(&self, id: &str, photos: &[PathBuf]) -> Result<Vec<String>> {
        let dir = self.namespace_dir(id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create media namespace {}", dir.display()))?;
        let mut stored = Vec::with_capacity(photos.len());
        for (index, source) in photos.iter().enumerate() {
            let file_name = format!("{index:03}.jpg");
            import_one(source, &dir.join(&file_name))
                .with_context(|| format!("failed to import photo {}", source.display()))?;
            stored.push(format!("media/{id}/{file_name}"));
        }
        debug!("imported {} photos into namespace {id}", stored.len());
        Ok(stored)
    }

    // Bulk delete of every object under an invitation id.
    pub fn delete_namespace(&self, id: &str) -> Result<()> {
        let dir = self.namespace_dir(id);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("failed to delete media namespace {}", dir.display()))?;
        }
        Ok(())
    }
}

fn import_one(source: &Path, dest: &Path) -> Result<()> {
    let bytes = fs::read(source)?;
    let image = image::load_from_memory(&bytes)?;
    // 1 = normal, 3 = 180°, 6 = 90° CW, 8 = 270° CW. Flipped variants are
    // rare from phone cameras and pass through untouched.
    let image = match exif_orientation(&bytes) {
        3 => image.rotate180(),
        6 => image.rotate90(),
        8 => image.rotate270(),
        _ => image,
    };
    let image = if image.width().max(image.height()) > MAX_PHOTO_EDGE {
        image.resize(MAX_PHOTO_EDGE, MAX_PHOTO_EDGE, FilterType::Triangle)
    } else {
        image
    };
    image.to_rgb8().save(dest)?;
    Ok(())
}

fn exif_orientation(bytes: &[u8]) -> u16 {
    let Ok(exif) = exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
        return 1;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| match &field.value {
            Value::Short(values) => values.first().copied(),
            _ => None,
        })
        .unwrap_or(1)
}

// Form-time photo listing: image files of a directory, ordered by name.
pub fn collect_photo_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read photo directory {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            match ext.to_lowercase().as_str() {
                "png" | "jpg" | "jpeg" | "bmp" | "gif" => paths.push(path),
                _ => {}
            }
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if paths.is_empty() {
        bail!("no image files found in directory {}", dir.display());
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::tempdir;

    fn write_test_image(path: &Path, width: u32, height: u32) {
        RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn import_stores_numbered_jpegs_under_the_namespace() {
        let photos_dir = tempdir().unwrap();
        let root = tempdir().unwrap();
        let a = photos_dir.path().join("a.png");
        let b = photos_dir.path().join("b.png");
        write_test_image(&a, 8, 4);
        write_test_image(&b, 4, 8);

        let media = MediaStore::new(root.path());
        let stored = media.import_photos("minkyuyoonjou", &[a, b]).unwrap();
        assert_eq!(
            stored,
            vec![
                "media/minkyuyoonjou/000.jpg".to_string(),
                "media/minkyuyoonjou/001.jpg".to_string(),
            ]
        );
        for relative in &stored {
            assert!(media.resolve(relative).is_file());
        }
    }

    #[test]
    fn oversized_photos_are_downscaled_to_the_edge_cap() {
        let photos_dir = tempdir().unwrap();
        let root = tempdir().unwrap();
        let big = photos_dir.path().join("big.png");
        write_test_image(&big, MAX_PHOTO_EDGE * 2, 100);

        let media = MediaStore::new(root.path());
        let stored = media.import_photos("wide", &[big]).unwrap();
        let reloaded = image::open(media.resolve(&stored[0])).unwrap();
        assert_eq!(reloaded.width(), MAX_PHOTO_EDGE);
        assert_eq!(reloaded.height(), 50); // aspect preserved
    }

    #[test]
    fn delete_namespace_removes_everything_and_is_idempotent() {
        let photos_dir = tempdir().unwrap();
        let root = tempdir().unwrap();
        let photo = photos_dir.path().join("p.png");
        write_test_image(&photo, 4, 4);

        let media = MediaStore::new(root.path());
        let stored = media.import_photos("gone", &[photo]).unwrap();
        assert!(media.resolve(&stored[0]).exists());

        media.delete_namespace("gone").unwrap();
        assert!(!media.resolve(&stored[0]).exists());
        media.delete_namespace("gone").unwrap(); // second call is a no-op
    }

    #[test]
    fn photo_listing_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        write_test_image(&dir.path().join("b.png"), 2, 2);
        write_test_image(&dir.path().join("a.jpg"), 2, 2);
        fs::write(dir.path().join("notes.txt"), "not a photo").unwrap();

        let paths = collect_photo_paths(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn empty_photo_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect_photo_paths(dir.path()).is_err());
    }
}
