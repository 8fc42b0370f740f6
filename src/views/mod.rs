pub mod card;
pub mod dashboard;
pub mod layout;
pub mod settings;
