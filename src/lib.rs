pub mod chat;
pub mod config;
pub mod cookie;
pub mod host;
pub mod mood;
pub mod theme;
pub mod types;
pub mod ui;
pub mod views;
