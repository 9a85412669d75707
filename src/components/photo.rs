use crate::config::{AppConfig, CameraSettings};
use crate::error::AppError;
use crate::services::draft_service::{self, SqliteDraftStore};
use crate::services::photo_attachment::{
    PhotoAttachmentController, PhotoEvent, PhotoLabels, PhotoView,
};
use crate::services::photo_preview::load_preview;
use crate::services::photo_storage::PermanentPhotoProvider;
use crate::Screen;
use device_camera::{AcquisitionMode, CapabilityProvider, DevicePicker};
use dioxus::prelude::*;
use dioxus_i18n::t;
use uuid::Uuid;

type Controller = PhotoAttachmentController<SqliteDraftStore>;

/// Opens the draft and wires the controller's events to the screen signals
fn load_controller(
    draft_id: Uuid,
    labels: PhotoLabels,
    camera: CameraSettings,
    mut view: Signal<Option<PhotoView>>,
    mut error: Signal<Option<String>>,
) -> Result<Controller, AppError> {
    let store = SqliteDraftStore::open()?;
    let draft = draft_service::load_draft(store.connection(), &draft_id)?;

    let mut controller = PhotoAttachmentController::new(draft.clone(), store, labels, camera)
        .with_listener(move |event| match event {
            PhotoEvent::StateChanged(v) => view.set(Some(v.clone())),
            PhotoEvent::Error(msg) => error.set(Some(msg.clone())),
        });
    controller.on_display(draft);
    Ok(controller)
}

#[component]
pub fn PhotoScreen(draft_id: Uuid, on_navigate: EventHandler<Screen>) -> Element {
    let config = use_hook(AppConfig::load);
    let labels = use_hook(|| PhotoLabels {
        next: t!("photo-next"),
        skip: t!("photo-skip"),
        photo_failed: t!("photo-failed"),
    });
    let preview_size = config.storage.preview_size;

    let view = use_signal(|| None::<PhotoView>);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);
    let mut controller = use_signal(|| None::<Controller>);
    let photo_dir = use_signal(|| config.photo_directory());

    use_effect(move || {
        match load_controller(
            draft_id,
            labels.clone(),
            config.camera.clone(),
            view,
            error,
        ) {
            Ok(c) => controller.set(Some(c)),
            Err(e) => {
                log::error!("Photo screen could not load draft {}: {}", draft_id, e);
                error.set(Some(e.user_message()));
            }
        }
    });

    use_drop(move || {
        if let Ok(mut c) = controller.try_write() {
            if let Some(c) = c.as_mut() {
                c.teardown();
            }
        }
    });

    let preview = use_resource(move || async move {
        match view() {
            Some(v) => load_preview(v.image_src, preview_size).await,
            None => String::new(),
        }
    });
    let preview_src = preview.read().clone().unwrap_or_default();

    let mut acquire = move |mode: AcquisitionMode| {
        error.set(None);
        let begun = controller
            .write()
            .as_mut()
            .map(|c| c.begin_acquisition(mode));
        let options = match begun {
            Some(Ok(options)) => options,
            Some(Err(e)) => {
                log::warn!("Photo request not started: {}", e);
                return;
            }
            None => return,
        };

        busy.set(true);
        let provider = PermanentPhotoProvider::new(DevicePicker::default(), photo_dir());
        spawn(async move {
            let outcome = provider.acquire(&options).await;
            if let Some(c) = controller.write().as_mut() {
                c.complete_acquisition(outcome);
            }
            busy.set(false);
        });
    };

    let mut detach = move || {
        error.set(None);
        if let Some(c) = controller.write().as_mut() {
            c.detach_photo();
        }
    };

    let current = view();
    let next_label = current
        .as_ref()
        .map(|v| v.next_label.clone())
        .unwrap_or_else(|| t!("photo-skip"));

    rsx! {
        div { id: "photo-page", style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",

            div { style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 24px;",
                button {
                    class: "btn-secondary",
                    style: "padding: 8px 16px;",
                    onclick: move |_| on_navigate.call(Screen::Around),
                    "← "
                    {t!("action-back")}
                }
                h1 { style: "color: #0066cc; font-size: 24px; font-weight: 700; margin: 0;",
                    {t!("photo-title")}
                }
                button {
                    id: "photo-next-btn",
                    class: "btn-primary",
                    style: "padding: 8px 16px;",
                    disabled: busy(),
                    onclick: move |_| on_navigate.call(Screen::Details),
                    "{next_label} →"
                }
            }

            if let Some(err) = error() {
                div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                    "⚠️ {err}"
                }
            }

            div { class: "card",
                if current.as_ref().is_some_and(|v| v.show_photo()) {
                    div { id: "display_photo", style: "display: flex; flex-direction: column; gap: 12px;",
                        img {
                            id: "photo",
                            src: "{preview_src}",
                            style: "width: 100%; border-radius: 8px; object-fit: contain; background: #ddd;",
                        }
                        button {
                            id: "id_del_photo_button",
                            class: "btn-secondary",
                            style: "padding: 10px; font-size: 14px;",
                            disabled: busy(),
                            onclick: move |_| detach(),
                            "🗑️ "
                            {t!("photo-remove")}
                        }
                    }
                } else {
                    div { id: "add_photo", style: "display: flex; flex-direction: column; gap: 12px;",
                        div { style: "width: 100%; height: 120px; border: 2px dashed #ccc; border-radius: 8px; display: flex; align-items: center; justify-content: center; color: #999; font-size: 14px;",
                            {t!("photo-none-selected")}
                        }
                        div { style: "display: flex; gap: 8px;",
                            button {
                                id: "id_photo_button",
                                class: "btn-secondary",
                                style: "flex: 1; padding: 10px; font-size: 14px;",
                                disabled: busy() || controller.read().is_none(),
                                onclick: move |_| acquire(AcquisitionMode::Capture),
                                if busy() {
                                    "⏳ "
                                    {t!("action-loading")}
                                } else {
                                    "📷 "
                                    {t!("action-camera")}
                                }
                            }
                            button {
                                id: "id_existing",
                                class: "btn-secondary",
                                style: "flex: 1; padding: 10px; font-size: 14px;",
                                disabled: busy() || controller.read().is_none(),
                                onclick: move |_| acquire(AcquisitionMode::SelectExisting),
                                if busy() {
                                    "⏳ "
                                    {t!("action-loading")}
                                } else {
                                    "🖼️ "
                                    {t!("action-gallery")}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
