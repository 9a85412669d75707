use crate::Screen;
use dioxus::prelude::*;
use dioxus_i18n::t;

/// Frame for the wizard screens around the photo step. They only offer the
/// way back and forward here.
#[component]
pub fn WizardStep(
    title: String,
    back: Option<Screen>,
    forward: Option<Screen>,
    on_navigate: EventHandler<Screen>,
) -> Element {
    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",
            div { style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 24px;",
                if let Some(screen) = back {
                    button {
                        class: "btn-secondary",
                        style: "padding: 8px 16px;",
                        onclick: move |_| on_navigate.call(screen.clone()),
                        "← "
                        {t!("action-back")}
                    }
                }
                h1 { style: "color: #0066cc; font-size: 24px; font-weight: 700; margin: 0;",
                    "{title}"
                }
                if let Some(screen) = forward {
                    button {
                        class: "btn-primary",
                        style: "padding: 8px 16px;",
                        onclick: move |_| on_navigate.call(screen.clone()),
                        {t!("action-next")}
                        " →"
                    }
                }
            }
        }
    }
}
