// Portfolio page library - headless page components driven by a host

pub mod animation;
pub mod app;
pub mod config;
pub mod contact;
pub mod dom;
pub mod events;
pub mod github;
pub mod loading;
pub mod navigation;
pub mod notification;
pub mod services;
pub mod terminal;

pub use app::Portfolio;
pub use config::Config;
