use dioxus::prelude::*;
use dioxus_i18n::prelude::use_init_i18n;
use dioxus_i18n::t;
use uuid::Uuid;

mod components;
mod config;
mod database;
mod error;
mod i18n;
mod models;
mod services;

use components::{PhotoScreen, WizardStep};
use config::AppConfig;
use error::AppError;
use services::{draft_service, photo_storage};

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("streetreport"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Screens of the report wizard around the photo step
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Around,
    Photo,
    Details,
}

/// Opens the database, drops photos no draft uses any more and returns the
/// draft to continue with
fn open_current_draft() -> Result<Uuid, AppError> {
    let config = AppConfig::load();
    let conn = database::init_database()?;

    if let Err(e) = photo_storage::cleanup_orphaned_photos(&conn, &config.photo_directory()) {
        log::warn!("Photo cleanup failed: {}", e);
    }

    let draft = draft_service::current_or_new_draft(&conn)?;
    log::info!("Continuing draft {}", draft.id);
    Ok(draft.id)
}

#[component]
fn App() -> Element {
    use_init_i18n(i18n::init_i18n);
    let mut current_screen = use_signal(|| Screen::Photo);
    let draft = use_hook(|| open_current_draft().map_err(|e| e.to_string()));

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",
            div { style: "flex: 1; overflow-y: auto;",
                match draft {
                    Err(e) => rsx! {
                        div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin: 16px; border-radius: 8px; font-size: 14px;",
                            "⚠️ "
                            {t!("error-startup", error: e)}
                        }
                    },
                    Ok(draft_id) => match current_screen() {
                        Screen::Around => rsx! {
                            WizardStep {
                                title: t!("screen-around"),
                                back: None,
                                forward: Some(Screen::Photo),
                                on_navigate: move |s| current_screen.set(s),
                            }
                        },
                        Screen::Photo => rsx! {
                            PhotoScreen { draft_id, on_navigate: move |s| current_screen.set(s) }
                        },
                        Screen::Details => rsx! {
                            WizardStep {
                                title: t!("screen-details"),
                                back: Some(Screen::Photo),
                                forward: None,
                                on_navigate: move |s| current_screen.set(s),
                            }
                        },
                    },
                }
            }
        }
    }
}
