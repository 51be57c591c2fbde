pub mod config;
pub mod content;
pub mod i18n;
pub mod navigation;
pub mod realtime;
pub mod richtext;
pub mod security;
pub mod server;
pub mod store;
