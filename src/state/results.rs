/// On-disk cache of edited results
///
/// Every successful edit is written here so the last result can be
/// shown again after a restart. Files are named by completion time.
use chrono::Utc;
use std::path::{Path, PathBuf};

use super::data::EditedImage;

/// Save a result into `dir`, creating it if needed
///
/// Returns the path of the written file.
pub async fn save_result(dir: &Path, image: &EditedImage) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let stamp = Utc::now().format("%Y%m%d-%H%M%S-%3f");
    let mut path = dir.join(format!("edit-{}.{}", stamp, image.extension()));

    // Two results completing in the same millisecond
    let mut suffix = 1;
    while tokio::fs::try_exists(&path).await.unwrap_or(false) {
        path = dir.join(format!("edit-{}-{}.{}", stamp, suffix, image.extension()));
        suffix += 1;
    }

    tokio::fs::write(&path, &image.bytes[..]).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::png_bytes;

    #[tokio::test]
    async fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        let image = EditedImage::decode(png_bytes(3)).unwrap();

        let path = save_result(&results, &image).await.unwrap();
        assert_eq!(path.extension().unwrap(), "png");

        let restored = EditedImage::restore(&path).unwrap();
        assert_eq!(restored.bytes, image.bytes);
        assert_eq!(restored.saved_to.as_deref(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let image = EditedImage::decode(png_bytes(3)).unwrap();

        let a = save_result(dir.path(), &image).await.unwrap();
        let b = save_result(dir.path(), &image).await.unwrap();
        assert_ne!(a, b);
    }
}
