use crate::error::AppError;
use device_camera::{to_file_uri, AcquisitionOutcome, CapabilityProvider, PictureOptions};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem path behind a `file://` locator. Other schemes have no local path.
pub fn locator_to_path(locator: &str) -> Option<PathBuf> {
    if let Some(path) = locator.strip_prefix("file://") {
        Some(PathBuf::from(path))
    } else if locator.starts_with('/') {
        Some(PathBuf::from(locator))
    } else {
        None
    }
}

/// True for file names `persist_photo` hands out: `<uuid>.<ext>`
fn is_stored_photo_name(path: &Path) -> bool {
    let stem_is_uuid = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| Uuid::parse_str(s).is_ok());
    stem_is_uuid && path.extension().is_some()
}

/// Copies an acquired picture into `photo_dir` under a UUID file name and
/// returns the new `file://` locator. Camera results live in cache storage the
/// OS may clear at any time. Locators without a local path (`content://`) are
/// owned by the OS and returned as they are.
pub fn persist_photo(locator: &str, photo_dir: &Path) -> Result<String, AppError> {
    let Some(source) = locator_to_path(locator) else {
        log::debug!("Keeping non-file locator {}", locator);
        return Ok(locator.to_string());
    };

    if source.starts_with(photo_dir) {
        return Ok(locator.to_string());
    }

    std::fs::create_dir_all(photo_dir)?;

    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string());
    let target = photo_dir.join(format!("{}.{}", Uuid::new_v4(), extension));

    std::fs::copy(&source, &target)?;
    log::info!("Stored photo {:?} as {:?}", source, target);

    Ok(to_file_uri(&target.to_string_lossy()))
}

/// Removes photos stored by `persist_photo` that no draft refers to. Other
/// files in `photo_dir` are left alone. Returns how many were deleted.
pub fn cleanup_orphaned_photos(conn: &Connection, photo_dir: &Path) -> Result<usize, AppError> {
    if !photo_dir.exists() {
        return Ok(0);
    }

    let referenced: Vec<PathBuf> = crate::services::draft_service::referenced_photos(conn)?
        .iter()
        .filter_map(|l| locator_to_path(l))
        .collect();

    let mut removed = 0;
    for entry in std::fs::read_dir(photo_dir)?.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_stored_photo_name(&path) || referenced.contains(&path) {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Could not remove orphaned photo {:?}: {}", path, e),
        }
    }

    if removed > 0 {
        log::info!("Removed {} orphaned photos", removed);
    }
    Ok(removed)
}

/// Wraps a provider so successful acquisitions are moved to permanent storage
/// before anyone sees the locator
pub struct PermanentPhotoProvider<P> {
    inner: P,
    photo_dir: PathBuf,
}

impl<P> PermanentPhotoProvider<P> {
    pub fn new(inner: P, photo_dir: PathBuf) -> Self {
        Self { inner, photo_dir }
    }
}

impl<P: CapabilityProvider> CapabilityProvider for PermanentPhotoProvider<P> {
    async fn acquire(&self, options: &PictureOptions) -> AcquisitionOutcome {
        match self.inner.acquire(options).await {
            AcquisitionOutcome::Success(locator) => match persist_photo(&locator, &self.photo_dir)
            {
                Ok(permanent) => AcquisitionOutcome::Success(permanent),
                Err(e) => {
                    log::error!("Failed to store acquired photo {}: {}", locator, e);
                    AcquisitionOutcome::Failed(e.to_string())
                }
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use crate::models::Draft;
    use crate::services::draft_service::save_draft;
    use device_camera::AcquisitionMode;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("streetreport-{}-{}", name, Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    struct FixedProvider(AcquisitionOutcome);

    impl CapabilityProvider for FixedProvider {
        async fn acquire(&self, _options: &PictureOptions) -> AcquisitionOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn test_locator_to_path() {
        assert_eq!(
            locator_to_path("file:///tmp/img1.jpg"),
            Some(PathBuf::from("/tmp/img1.jpg"))
        );
        assert_eq!(locator_to_path("/tmp/img1.jpg"), Some(PathBuf::from("/tmp/img1.jpg")));
        assert_eq!(locator_to_path("content://media/1"), None);
    }

    #[test]
    fn test_persist_photo_copies_into_photo_dir() {
        let cache = temp_dir("cache");
        let photos = cache.join("photos");
        let source = cache.join("IMG_0001.JPG");
        std::fs::write(&source, b"jpeg bytes").unwrap();

        let locator = to_file_uri(&source.to_string_lossy());
        let stored = persist_photo(&locator, &photos).unwrap();
        let stored_path = locator_to_path(&stored).unwrap();

        assert!(stored_path.starts_with(&photos));
        assert_eq!(stored_path.extension().unwrap(), "jpg");
        assert_eq!(std::fs::read(&stored_path).unwrap(), b"jpeg bytes");
        assert!(source.exists());
    }

    #[test]
    fn test_persist_photo_keeps_stored_photo() {
        let photos = temp_dir("stored");
        let existing = photos.join("a.jpg");
        std::fs::write(&existing, b"x").unwrap();
        let locator = to_file_uri(&existing.to_string_lossy());

        assert_eq!(persist_photo(&locator, &photos).unwrap(), locator);
    }

    #[test]
    fn test_persist_photo_keeps_content_locator() {
        let photos = temp_dir("content");
        let locator = "content://media/external/images/media/42";
        assert_eq!(persist_photo(locator, &photos).unwrap(), locator);
        assert_eq!(std::fs::read_dir(&photos).unwrap().count(), 0);
    }

    #[test]
    fn test_persist_missing_file_fails() {
        let photos = temp_dir("missing");
        let result = persist_photo("file:///nonexistent/streetreport/img.jpg", &photos);
        assert!(matches!(result, Err(AppError::Filesystem(_))));
    }

    #[test]
    fn test_cleanup_orphaned_photos() {
        let conn = Connection::open_in_memory().unwrap();
        database::schema::init_schema(&conn).unwrap();
        let photos = temp_dir("orphans");

        let kept = photos.join(format!("{}.jpg", Uuid::new_v4()));
        let orphan = photos.join(format!("{}.jpg", Uuid::new_v4()));
        std::fs::write(&kept, b"k").unwrap();
        std::fs::write(&orphan, b"o").unwrap();

        let mut draft = Draft::new();
        draft.file = to_file_uri(&kept.to_string_lossy());
        save_draft(&conn, &draft).unwrap();

        assert_eq!(cleanup_orphaned_photos(&conn, &photos).unwrap(), 1);
        assert!(kept.exists());
        assert!(!orphan.exists());
    }

    #[test]
    fn test_cleanup_leaves_foreign_files() {
        let conn = Connection::open_in_memory().unwrap();
        database::schema::init_schema(&conn).unwrap();
        let photos = temp_dir("foreign");

        let db = photos.join("streetreport.db");
        let camera_roll = photos.join("IMG_20260101_120000.jpg");
        let no_extension = photos.join(Uuid::new_v4().to_string());
        let orphan = photos.join(format!("{}.jpg", Uuid::new_v4()));
        for path in [&db, &camera_roll, &no_extension, &orphan] {
            std::fs::write(path, b"x").unwrap();
        }

        assert_eq!(cleanup_orphaned_photos(&conn, &photos).unwrap(), 1);
        assert!(db.exists());
        assert!(camera_roll.exists());
        assert!(no_extension.exists());
        assert!(!orphan.exists());
    }

    #[tokio::test]
    async fn test_permanent_provider_rewrites_locator() {
        let cache = temp_dir("provider");
        let source = cache.join("capture.jpg");
        std::fs::write(&source, b"img").unwrap();
        let photos = cache.join("photos");

        let provider = PermanentPhotoProvider::new(
            FixedProvider(AcquisitionOutcome::Success(to_file_uri(&source.to_string_lossy()))),
            photos.clone(),
        );
        let outcome = provider
            .acquire(&PictureOptions::for_mode(AcquisitionMode::Capture))
            .await;

        match outcome {
            AcquisitionOutcome::Success(locator) => {
                assert!(locator_to_path(&locator).unwrap().starts_with(&photos));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_permanent_provider_keeps_content_success() {
        let locator = "content://media/external/images/media/42".to_string();
        let provider = PermanentPhotoProvider::new(
            FixedProvider(AcquisitionOutcome::Success(locator.clone())),
            temp_dir("content-provider"),
        );
        let outcome = provider
            .acquire(&PictureOptions::for_mode(AcquisitionMode::SelectExisting))
            .await;
        assert_eq!(outcome, AcquisitionOutcome::Success(locator));
    }

    #[tokio::test]
    async fn test_permanent_provider_passes_cancellation_through() {
        let provider = PermanentPhotoProvider::new(
            FixedProvider(AcquisitionOutcome::Cancelled("Camera cancelled.".to_string())),
            temp_dir("cancel"),
        );
        let outcome = provider
            .acquire(&PictureOptions::for_mode(AcquisitionMode::Capture))
            .await;
        assert_eq!(
            outcome,
            AcquisitionOutcome::Cancelled("Camera cancelled.".to_string())
        );
    }
}
