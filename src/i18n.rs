use dioxus_i18n::prelude::*;

/// Initialize i18n configuration with British English as default language
pub fn init_i18n() -> I18nConfig {
    I18nConfig::new(unic_langid::langid!("en-GB")).with_locale(Locale::new_static(
        unic_langid::langid!("en-GB"),
        include_str!("../locales/en-GB.ftl"),
    ))
}
