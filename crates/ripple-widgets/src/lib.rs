//! Shared UI widgets for the ripple scope
//!
//! Provides the scope canvas, the channel-to-subscription bridge and the
//! shared color constants. Follows iced conventions: state lives in the
//! application, view functions return `Element`s, and canvas `Program`s
//! only draw.

pub mod scope;
pub mod subscription;
pub mod theme;

pub use scope::{plot_points, scope, Scope};
pub use subscription::channel_subscription;
