use crate::error::AppError;
use device_camera::{AcquisitionMode, PictureOptions, DEFAULT_QUALITY};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "streetreport.toml";

/// App settings read from `streetreport.toml` in the app directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub quality: u8,
    pub correct_orientation: bool,
    /// Keep a copy of captured pictures in the device gallery
    pub save_captures_to_album: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            correct_orientation: true,
            save_captures_to_album: true,
        }
    }
}

impl CameraSettings {
    /// Picture options for one request in the given mode
    pub fn options_for(&self, mode: AcquisitionMode) -> PictureOptions {
        let mut options = PictureOptions::for_mode(mode).with_quality(self.quality);
        options.correct_orientation = self.correct_orientation;
        if mode == AcquisitionMode::Capture {
            options.save_to_photo_album = self.save_captures_to_album;
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory below the app directory that holds attached photos
    pub photo_dir: String,
    /// Longest edge of the on-screen preview in pixels
    pub preview_size: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            photo_dir: "photos".to_string(),
            preview_size: 512,
        }
    }
}

impl AppConfig {
    /// Parses a config file; fields that are missing keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `photo_dir` must name a subdirectory of the app directory. Orphan
    /// cleanup deletes files there.
    pub fn validate(&self) -> Result<(), AppError> {
        let dir = Path::new(&self.storage.photo_dir);
        let only_normal = dir.components().all(|c| matches!(c, Component::Normal(_)));
        if self.storage.photo_dir.trim().is_empty() || !only_normal {
            return Err(AppError::Config(format!(
                "photo_dir must be a relative subdirectory, got {:?}",
                self.storage.photo_dir
            )));
        }
        Ok(())
    }

    /// Loads `streetreport.toml` from `dir`, falling back to defaults when the
    /// file does not exist
    pub fn load_from(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Loads the config from the app directory. A broken file is logged and
    /// replaced by defaults so the wizard still starts.
    pub fn load() -> Self {
        let dir = crate::database::get_app_directory();
        match Self::load_from(&dir) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    pub fn photo_directory(&self) -> PathBuf {
        crate::database::get_app_directory().join(&self.storage.photo_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.camera.quality, 49);
        assert_eq!(config.storage.photo_dir, "photos");
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml(
            "[camera]\nquality = 80\n\n[storage]\npreview_size = 256\n",
        )
        .unwrap();
        assert_eq!(config.camera.quality, 80);
        assert!(config.camera.correct_orientation);
        assert_eq!(config.storage.preview_size, 256);
        assert_eq!(config.storage.photo_dir, "photos");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let result = AppConfig::from_toml("[camera]\nquality = \"high\"\n");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_photo_dir_outside_app_directory_is_rejected() {
        for dir in ["", " ", ".", "..", "./", "../photos", "photos/../..", "/sdcard/DCIM/Camera"] {
            let content = format!("[storage]\nphoto_dir = {:?}\n", dir);
            let result = AppConfig::from_toml(&content);
            assert!(matches!(result, Err(AppError::Config(_))), "photo_dir {:?}", dir);
        }
    }

    #[test]
    fn test_nested_photo_dir_is_accepted() {
        let config = AppConfig::from_toml("[storage]\nphoto_dir = \"media/photos\"\n").unwrap();
        assert_eq!(config.storage.photo_dir, "media/photos");
    }

    #[test]
    fn test_options_for_modes() {
        let settings = CameraSettings::default();
        let capture = settings.options_for(AcquisitionMode::Capture);
        assert!(capture.save_to_photo_album);
        assert_eq!(capture.quality, 49);

        let select = settings.options_for(AcquisitionMode::SelectExisting);
        assert!(!select.save_to_photo_album);
        assert!(select.correct_orientation);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join(format!("streetreport-cfg-{}", uuid::Uuid::new_v4()));
        let config = AppConfig::load_from(&dir).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
