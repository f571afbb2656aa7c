//! User interface modules for ripple-scope

pub mod app;
pub mod handlers;
pub mod message;
pub mod settings;

pub use app::ScopeApp;
