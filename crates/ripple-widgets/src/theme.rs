//! Shared theme constants for ripple UI components

use iced::Color;

/// Scope canvas background (#0F1217)
pub const SCOPE_BACKGROUND: Color = Color::from_rgb(0.06, 0.07, 0.09);

/// Scope trace (#40F28C)
pub const SCOPE_TRACE: Color = Color::from_rgb(0.25, 0.95, 0.55);

/// Dimmed text for secondary chrome (#8C949E)
pub const TEXT_DIM: Color = Color::from_rgb(0.55, 0.58, 0.62);

/// Modal backdrop tint (black at 60%)
pub const BACKDROP: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.6,
};
