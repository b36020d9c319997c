//! Download post-processing: fetch each photo and store it as PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::client::{ApiError, Transport};
use crate::models::{ImageFormat, Photo};

/// Download `photos` into `destination` using the `format` variant.
///
/// Both the destination and the format are checked before any request is
/// made. Photos are fetched one at a time, in order; the first failure stops
/// the batch and files already written stay on disk. Every image is decoded
/// and written as `<id>.png`, whatever encoding the API served.
pub async fn download(
    transport: &dyn Transport,
    photos: &[Photo],
    destination: &Path,
    format: &str,
) -> Result<Vec<PathBuf>, ApiError> {
    download_with_progress(transport, photos, destination, format, |_, _| {}).await
}

/// Same as [`download`], calling `on_saved(index, path)` after each file is written.
pub async fn download_with_progress<F>(
    transport: &dyn Transport,
    photos: &[Photo],
    destination: &Path,
    format: &str,
    mut on_saved: F,
) -> Result<Vec<PathBuf>, ApiError>
where
    F: FnMut(usize, &Path),
{
    if !destination.is_dir() {
        return Err(ApiError::Configuration(format!(
            "download destination {} is not a directory or does not exist",
            destination.display()
        )));
    }
    let format: ImageFormat = format
        .parse()
        .map_err(|e| ApiError::Configuration(format!("{}", e)))?;

    let mut saved = Vec::with_capacity(photos.len());
    for (index, photo) in photos.iter().enumerate() {
        let bytes = transport.fetch_bytes(photo.url_for(format)).await?;
        let path = destination.join(file_name(&photo.id));

        let image = image::load_from_memory(&bytes)?;
        let mut encoded = Cursor::new(Vec::new());
        image.write_to(&mut encoded, image::ImageFormat::Png)?;
        tokio::fs::write(&path, encoded.into_inner()).await?;

        tracing::info!(id = %photo.id, path = %path.display(), "saved photo");
        on_saved(index, &path);
        saved.push(path);
    }

    Ok(saved)
}

/// File name a photo is stored under
pub fn file_name(id: &str) -> String {
    format!("{}.png", id.replace(['/', '\\'], "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::sample_urls;
    use crate::client::{MockTransport, RecordedCall};
    use tempfile::tempdir;

    fn tiny_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    fn photos(ids: &[&str]) -> Vec<Photo> {
        ids.iter().map(|id| Photo::new(*id, sample_urls(id))).collect()
    }

    #[tokio::test]
    async fn test_downloads_each_photo_as_png() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();
        mock.push_bytes(tiny_jpeg()).push_bytes(tiny_jpeg());

        let saved = download(&mock, &photos(&["id1", "id2"]), dir.path(), "small")
            .await
            .unwrap();

        assert_eq!(mock.bytes_count(), 2);
        assert_eq!(saved, vec![dir.path().join("id1.png"), dir.path().join("id2.png")]);
        for path in &saved {
            let format = image::ImageFormat::from_path(path).unwrap();
            assert_eq!(format, image::ImageFormat::Png);
            let reread = image::open(path).unwrap();
            assert_eq!(reread.width(), 2);
        }
        assert_eq!(
            mock.calls()[0],
            RecordedCall::Bytes {
                url: sample_urls("id1").small
            }
        );
    }

    #[tokio::test]
    async fn test_requested_format_url_used() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();
        mock.push_bytes(tiny_jpeg());

        download(&mock, &photos(&["x"]), dir.path(), "thumb")
            .await
            .unwrap();
        assert_eq!(
            mock.calls(),
            vec![RecordedCall::Bytes {
                url: sample_urls("x").thumb
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_destination_fails_before_network() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();

        let result = download(
            &mock,
            &photos(&["id1"]),
            &dir.path().join("nope"),
            "small",
        )
        .await;

        assert!(matches!(result, Err(ApiError::Configuration(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_file_destination_fails_before_network() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a-file");
        std::fs::write(&file, b"x").unwrap();
        let mock = MockTransport::new();

        let result = download(&mock, &photos(&["id1"]), &file, "small").await;

        assert!(matches!(result, Err(ApiError::Configuration(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_format_fails_before_network() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();

        let result = download(&mock, &photos(&["id1"]), dir.path(), "huge").await;

        assert!(matches!(result, Err(ApiError::Configuration(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_and_keeps_earlier_files() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();
        mock.push_bytes(tiny_jpeg())
            .push_bytes_error(ApiError::Status(404))
            .push_bytes(tiny_jpeg());

        let result = download(&mock, &photos(&["a", "b", "c"]), dir.path(), "small").await;

        assert!(matches!(result, Err(ApiError::Status(404))));
        assert_eq!(mock.bytes_count(), 2);
        assert!(dir.path().join("a.png").exists());
        assert!(!dir.path().join("b.png").exists());
        assert!(!dir.path().join("c.png").exists());
    }

    #[tokio::test]
    async fn test_undecodable_bytes() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();
        mock.push_bytes(b"definitely not an image".to_vec());

        let result = download(&mock, &photos(&["a"]), dir.path(), "small").await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
        assert!(!dir.path().join("a.png").exists());
    }

    #[tokio::test]
    async fn test_progress_callback() {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();
        mock.push_bytes(tiny_jpeg()).push_bytes(tiny_jpeg());

        let mut seen = Vec::new();
        download_with_progress(&mock, &photos(&["a", "b"]), dir.path(), "small", |i, _| {
            seen.push(i)
        })
        .await
        .unwrap();
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("Dwu85P9SOIk"), "Dwu85P9SOIk.png");
        assert_eq!(file_name("a/b"), "a_b.png");
    }
}
