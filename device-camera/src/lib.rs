//! # Device Camera
//!
//! Camera and gallery acquisition for Dioxus mobile apps.
//!
//! This crate provides:
//! - Picture options (source mode, gallery saving, quality, orientation)
//! - The Android picker reached over JNI, with a platform error elsewhere
//! - The `CapabilityProvider` trait the application programs against
//! - Classification of device reasons into success, cancellation and failure
//!
//! ## Platform Separation
//!
//! Everything that talks to the JVM lives in `picker`. Application code only
//! sees `CapabilityProvider`, so screens can be tested with a scripted provider.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use device_camera::{AcquisitionMode, CapabilityProvider, DevicePicker, PictureOptions};
//!
//! let picker = DevicePicker::default();
//! let outcome = picker
//!     .acquire(&PictureOptions::for_mode(AcquisitionMode::Capture))
//!     .await;
//! ```

pub mod options;
pub mod picker;
pub mod provider;

pub use options::{AcquisitionMode, DestinationType, PictureOptions, DEFAULT_QUALITY};
pub use picker::{locator_for, to_file_uri, AndroidPickerConfig, PickerError};
pub use provider::{
    is_cancellation, AcquisitionOutcome, CapabilityProvider, DevicePicker, CANCELLATION_REASONS,
};
