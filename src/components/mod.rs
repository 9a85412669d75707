pub mod photo;
pub mod wizard_step;

pub use photo::PhotoScreen;
pub use wizard_step::WizardStep;
