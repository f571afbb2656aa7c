//! Message handlers organized by concern
//!
//! Each sub-module provides handler methods on [`super::app::ScopeApp`],
//! keeping the update() match arms one line each.

pub mod capture;
pub mod settings;
