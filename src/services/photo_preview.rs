use crate::error::AppError;
use crate::services::photo_storage::locator_to_path;
use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;

/// Renders the photo behind `locator` as a JPEG data URL no larger than
/// `max_size` on its longest edge, for the preview `img` on the photo screen
pub fn preview_data_url(locator: &str, max_size: u32) -> Result<String, AppError> {
    let path = locator_to_path(locator)
        .ok_or_else(|| AppError::NotFound(format!("Photo {}", locator)))?;

    let img = image::open(&path)?;
    let img = if img.width() > max_size || img.height() > max_size {
        img.resize(max_size, max_size, FilterType::Triangle)
    } else {
        img
    };

    let mut buffer = Cursor::new(Vec::new());
    img.to_rgb8().write_to(&mut buffer, ImageFormat::Jpeg)?;

    let encoded = general_purpose::STANDARD.encode(buffer.into_inner());
    Ok(format!("data:image/jpeg;base64,{}", encoded))
}

/// Image source for the preview: a data URL when the photo can be read, the
/// raw locator otherwise (the webview may still resolve it)
pub fn preview_source(locator: &str, max_size: u32) -> String {
    if locator.is_empty() {
        return String::new();
    }
    match preview_data_url(locator, max_size) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("No preview for {}: {}", locator, e);
            locator.to_string()
        }
    }
}

/// `preview_source` on the blocking pool. Decoding a full camera JPEG takes
/// far too long for the UI thread.
pub async fn load_preview(locator: String, max_size: u32) -> String {
    if locator.is_empty() {
        return String::new();
    }
    let fallback = locator.clone();
    match tokio::task::spawn_blocking(move || preview_source(&locator, max_size)).await {
        Ok(src) => src,
        Err(e) => {
            log::error!("Preview task aborted: {}", e);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_jpeg(width: u32, height: u32) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("streetreport-{}.jpg", uuid::Uuid::new_v4()));
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        img.save_with_format(&path, ImageFormat::Jpeg).unwrap();
        path
    }

    #[test]
    fn test_preview_is_downscaled_data_url() {
        let path = write_test_jpeg(800, 400);
        let url = preview_data_url(&format!("file://{}", path.display()), 100).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let bytes = general_purpose::STANDARD
            .decode(url.trim_start_matches("data:image/jpeg;base64,"))
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 50);
    }

    #[tokio::test]
    async fn test_load_preview_off_thread() {
        let path = write_test_jpeg(40, 20);
        let url = load_preview(format!("file://{}", path.display()), 512).await;
        assert!(url.starts_with("data:image/jpeg;base64,"));

        assert_eq!(load_preview(String::new(), 512).await, "");
    }

    #[test]
    fn test_preview_source_falls_back_to_locator() {
        assert_eq!(preview_source("", 100), "");
        assert_eq!(
            preview_source("content://media/1", 100),
            "content://media/1"
        );
    }
}
