use crate::options::PictureOptions;
use crate::picker::{self, AndroidPickerConfig, PickerError};

/// Reasons the device reports when the user backed out of the camera or the
/// gallery. These are normal outcomes, not errors.
pub const CANCELLATION_REASONS: [&str; 3] =
    ["no image selected", "Selection cancelled.", "Camera cancelled."];

/// True when `reason` means the user declined to pick or capture a picture
pub fn is_cancellation(reason: &str) -> bool {
    CANCELLATION_REASONS.contains(&reason)
}

/// Result of one acquisition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    /// Resource locator of the acquired picture
    Success(String),
    Cancelled(String),
    Failed(String),
}

impl AcquisitionOutcome {
    /// Classifies a failure reason reported by the device
    pub fn from_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if is_cancellation(&reason) {
            AcquisitionOutcome::Cancelled(reason)
        } else {
            AcquisitionOutcome::Failed(reason)
        }
    }
}

impl From<Result<String, PickerError>> for AcquisitionOutcome {
    fn from(result: Result<String, PickerError>) -> Self {
        match result {
            Ok(locator) => AcquisitionOutcome::Success(locator),
            Err(PickerError::Failed(reason)) => AcquisitionOutcome::from_reason(reason),
            Err(e) => AcquisitionOutcome::Failed(e.to_string()),
        }
    }
}

/// Device subsystem that hands out pictures from the camera or the gallery
#[allow(async_fn_in_trait)]
pub trait CapabilityProvider {
    async fn acquire(&self, options: &PictureOptions) -> AcquisitionOutcome;
}

/// Provider backed by the platform picker. The blocking JNI poll runs on the
/// Tokio blocking pool so the UI loop keeps running.
#[derive(Debug, Clone, Default)]
pub struct DevicePicker {
    config: AndroidPickerConfig,
}

impl DevicePicker {
    pub fn new(config: AndroidPickerConfig) -> Self {
        Self { config }
    }
}

impl CapabilityProvider for DevicePicker {
    async fn acquire(&self, options: &PictureOptions) -> AcquisitionOutcome {
        let config = self.config.clone();
        let options = options.clone();
        let mode = options.mode;

        let result = tokio::task::spawn_blocking(move || {
            picker::acquire_picture_with_config(&config, &options)
        })
        .await;

        match result {
            Ok(result) => {
                let outcome = AcquisitionOutcome::from(result);
                log::debug!("Acquisition ({}) finished: {:?}", mode.as_str(), outcome);
                outcome
            }
            Err(e) => {
                log::error!("Picker task aborted: {}", e);
                AcquisitionOutcome::Failed(format!("Picker task aborted: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AcquisitionMode;

    #[test]
    fn test_cancellation_reasons() {
        assert!(is_cancellation("no image selected"));
        assert!(is_cancellation("Selection cancelled."));
        assert!(is_cancellation("Camera cancelled."));
        assert!(!is_cancellation("camera cancelled"));
        assert!(!is_cancellation("Unable to access camera"));
        assert!(!is_cancellation(""));
    }

    #[test]
    fn test_picker_result_classification() {
        let ok: Result<String, PickerError> = Ok("file:///tmp/a.jpg".to_string());
        assert_eq!(
            AcquisitionOutcome::from(ok),
            AcquisitionOutcome::Success("file:///tmp/a.jpg".to_string())
        );

        let cancelled: Result<String, PickerError> =
            Err(PickerError::Failed("Selection cancelled.".to_string()));
        assert_eq!(
            AcquisitionOutcome::from(cancelled),
            AcquisitionOutcome::Cancelled("Selection cancelled.".to_string())
        );

        let denied: Result<String, PickerError> =
            Err(PickerError::PermissionDenied("camera".to_string()));
        assert_eq!(
            AcquisitionOutcome::from(denied),
            AcquisitionOutcome::Failed("Permission denied: camera".to_string())
        );
    }

    #[cfg(not(target_os = "android"))]
    #[tokio::test]
    async fn test_device_picker_fails_off_device() {
        let picker = DevicePicker::default();
        let opts = PictureOptions::for_mode(AcquisitionMode::SelectExisting);
        let outcome = picker.acquire(&opts).await;
        assert!(matches!(outcome, AcquisitionOutcome::Failed(_)));
    }
}
