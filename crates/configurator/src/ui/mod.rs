pub mod admin;
pub mod notifications;
pub mod saved_configs;
pub mod status_bar;
pub mod steps;
