pub mod app_settings;
pub mod app_state;
pub mod display;
pub mod logo_cache;
pub mod messages;
pub mod network;
pub mod refresher;
pub mod rotation;
