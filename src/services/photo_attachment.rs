//! State machine behind the photo step of the report wizard.
//!
//! The controller owns the draft being edited while the screen is shown. It
//! asks a [`CapabilityProvider`] for pictures, writes the result into
//! `Draft::file`, saves through a [`DraftStore`] and publishes a [`PhotoView`]
//! for the screen to render. Display code never touches the draft directly.

use crate::config::CameraSettings;
use crate::error::AppError;
use crate::models::{AttachmentState, Draft};
use crate::services::draft_service::DraftStore;
use device_camera::{
    is_cancellation, AcquisitionMode, AcquisitionOutcome, CapabilityProvider, PictureOptions,
};

/// Localised strings the controller puts into the view
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoLabels {
    pub next: String,
    pub skip: String,
    pub photo_failed: String,
}

impl Default for PhotoLabels {
    fn default() -> Self {
        Self {
            next: "Next".to_string(),
            skip: "Skip".to_string(),
            photo_failed: "There was a problem attaching your photo.".to_string(),
        }
    }
}

/// What the photo screen should currently show
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoView {
    pub state: AttachmentState,
    /// Locator of the attached photo, empty when there is none
    pub image_src: String,
    /// Label of the forward button: "Next" with a photo, "Skip" without
    pub next_label: String,
}

impl PhotoView {
    pub fn show_photo(&self) -> bool {
        self.state == AttachmentState::Attached
    }

    #[allow(dead_code)]
    pub fn show_add_buttons(&self) -> bool {
        self.state == AttachmentState::Empty
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotoEvent {
    StateChanged(PhotoView),
    /// A user-visible, non-blocking error notification
    Error(String),
}

type Listener = Box<dyn FnMut(&PhotoEvent)>;

pub struct PhotoAttachmentController<S> {
    draft: Draft,
    store: S,
    labels: PhotoLabels,
    camera: CameraSettings,
    listener: Option<Listener>,
    pending: Option<AcquisitionMode>,
}

impl<S: DraftStore> PhotoAttachmentController<S> {
    pub fn new(draft: Draft, store: S, labels: PhotoLabels, camera: CameraSettings) -> Self {
        Self {
            draft,
            store,
            labels,
            camera,
            listener: None,
            pending: None,
        }
    }

    /// Registers the view binding that receives every [`PhotoEvent`]
    pub fn with_listener(mut self, listener: impl FnMut(&PhotoEvent) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    #[allow(dead_code)]
    pub fn photo_reference(&self) -> &str {
        &self.draft.file
    }

    pub fn state(&self) -> AttachmentState {
        self.draft.attachment_state()
    }

    /// True while a picture request is outstanding
    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> PhotoView {
        let state = self.state();
        let next_label = match state {
            AttachmentState::Attached => self.labels.next.clone(),
            AttachmentState::Empty => self.labels.skip.clone(),
        };
        PhotoView {
            state,
            image_src: self.draft.file.clone(),
            next_label,
        }
    }

    /// Screen shown: take the draft as persisted and publish its state
    pub fn on_display(&mut self, draft: Draft) {
        log::debug!("Photo screen shown for draft {}", draft.id);
        self.draft = draft;
        self.pending = None;
        self.emit_state();
    }

    /// Screen hidden: stop publishing and forget any outstanding request. A
    /// result that still arrives is dropped.
    pub fn teardown(&mut self) {
        log::debug!("Photo screen torn down for draft {}", self.draft.id);
        self.listener = None;
        self.pending = None;
    }

    /// Marks a request as outstanding and returns the options to hand to the
    /// provider. Only one request may be outstanding at a time.
    pub fn begin_acquisition(&mut self, mode: AcquisitionMode) -> Result<PictureOptions, AppError> {
        if let Some(pending) = self.pending {
            log::warn!(
                "Ignoring {} request, {} still outstanding",
                mode.as_str(),
                pending.as_str()
            );
            return Err(AppError::Busy);
        }
        self.pending = Some(mode);
        Ok(self.camera.options_for(mode))
    }

    /// Delivers the provider's answer for the outstanding request
    pub fn complete_acquisition(&mut self, outcome: AcquisitionOutcome) {
        if self.pending.take().is_none() {
            log::debug!("Dropping acquisition result without a request: {:?}", outcome);
            return;
        }
        match outcome {
            AcquisitionOutcome::Success(locator) => self.on_acquisition_success(locator),
            AcquisitionOutcome::Cancelled(reason) | AcquisitionOutcome::Failed(reason) => {
                self.on_acquisition_failure(&reason)
            }
        }
    }

    /// Takes a new photo with the camera
    #[allow(dead_code)]
    pub async fn request_capture<P: CapabilityProvider>(
        &mut self,
        provider: &P,
    ) -> Result<(), AppError> {
        self.request(provider, AcquisitionMode::Capture).await
    }

    /// Picks an existing photo from the device gallery
    #[allow(dead_code)]
    pub async fn request_select_existing<P: CapabilityProvider>(
        &mut self,
        provider: &P,
    ) -> Result<(), AppError> {
        self.request(provider, AcquisitionMode::SelectExisting).await
    }

    #[allow(dead_code)]
    async fn request<P: CapabilityProvider>(
        &mut self,
        provider: &P,
        mode: AcquisitionMode,
    ) -> Result<(), AppError> {
        let options = self.begin_acquisition(mode)?;
        let outcome = provider.acquire(&options).await;
        self.complete_acquisition(outcome);
        Ok(())
    }

    /// Attaches (or replaces) the photo
    pub fn on_acquisition_success(&mut self, locator: String) {
        log::info!("Attaching photo {} to draft {}", locator, self.draft.id);
        self.draft.file = locator;
        self.persist();
        self.emit_state();
    }

    /// Cancellations are silent; everything else gets the generic message.
    /// The draft is never touched.
    pub fn on_acquisition_failure(&mut self, reason: &str) {
        if is_cancellation(reason) {
            log::debug!("Photo acquisition cancelled: {}", reason);
            return;
        }
        log::warn!("Photo acquisition failed: {}", reason);
        let message = self.labels.photo_failed.clone();
        self.emit(PhotoEvent::Error(message));
    }

    /// Removes the photo. Detaching without a photo saves and publishes the
    /// same empty state again.
    pub fn detach_photo(&mut self) {
        log::info!("Detaching photo from draft {}", self.draft.id);
        self.draft.file.clear();
        self.persist();
        self.emit_state();
    }

    fn persist(&self) {
        // Save errors belong to the store; the state change still goes out
        if let Err(e) = self.store.save(&self.draft) {
            log::error!("Failed to save draft {}: {}", self.draft.id, e);
        }
    }

    fn emit_state(&mut self) {
        let view = self.view();
        self.emit(PhotoEvent::StateChanged(view));
    }

    fn emit(&mut self, event: PhotoEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}
