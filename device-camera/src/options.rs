use serde::{Deserialize, Serialize};

/// JPEG quality the wizard asks the device for. Moderate on purpose so
/// photos stay small enough to upload over mobile data.
pub const DEFAULT_QUALITY: u8 = 49;

/// Where the picture comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionMode {
    /// Take a new photo with the camera
    Capture,
    /// Choose an existing photo from the device library
    SelectExisting,
}

impl AcquisitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionMode::Capture => "capture",
            AcquisitionMode::SelectExisting => "select_existing",
        }
    }
}

/// How the acquired picture is handed back. The Android activity writes every
/// picture to a file, so a file URI is the only representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationType {
    /// A `file://` reference to the image on the device
    FileUri,
}

/// Options passed to the capability provider for one acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureOptions {
    pub mode: AcquisitionMode,
    /// Also store the picture in the device gallery
    pub save_to_photo_album: bool,
    /// JPEG compression quality, 0..=100
    pub quality: u8,
    pub destination_type: DestinationType,
    /// Rotate the picture according to its EXIF orientation
    pub correct_orientation: bool,
}

impl PictureOptions {
    /// Default options for the given mode. Only captures are saved to the
    /// gallery; a selected picture is already there.
    pub fn for_mode(mode: AcquisitionMode) -> Self {
        Self {
            mode,
            save_to_photo_album: mode == AcquisitionMode::Capture,
            quality: DEFAULT_QUALITY,
            destination_type: DestinationType::FileUri,
            correct_orientation: true,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(100);
        self
    }
}
