//! Settings overlay state and view
//!
//! Holds the local edit state for device and resolution while the overlay
//! is open. Local selections only reach the capture service when Apply
//! confirms them; closing the overlay any other way discards them.

use iced::widget::{button, column, container, pick_list, row, slider, text, Space};
use iced::{Alignment, Element, Length};

use ripple_core::capture::DEFAULT_DEVICE;
use ripple_core::ResolutionCurve;
use ripple_widgets::theme;

use super::message::{Message, SettingsMessage};

/// Where the settings state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPhase {
    /// Overlay closed; the applied configuration is authoritative
    Idle,
    /// Overlay open; local selections are independent of the service
    Editing,
    /// Apply confirmed; the reconfiguration sequence is running
    Applying,
}

/// Local settings state
///
/// Seeded from the service each time the overlay opens. A failed seed
/// query leaves the previous value in place, so the overlay always shows
/// something sensible.
pub struct SettingsState {
    pub phase: SettingsPhase,
    /// Input device names offered in the picker
    pub devices: Vec<String>,
    /// Locally selected device
    pub selected_device: String,
    /// Slider position in [0, 1]
    pub position: f32,
    /// Multiplier to commit on Apply; the label shows it at one decimal
    pub multiplier: f32,
}

impl SettingsState {
    pub fn new(curve: &ResolutionCurve) -> Self {
        let multiplier = 1.0f32.clamp(curve.min(), curve.max());
        Self {
            phase: SettingsPhase::Idle,
            devices: vec![DEFAULT_DEVICE.to_string()],
            selected_device: DEFAULT_DEVICE.to_string(),
            position: curve.to_position(multiplier),
            multiplier,
        }
    }

    /// Whether the overlay is visible (editing or applying)
    pub fn is_open(&self) -> bool {
        self.phase != SettingsPhase::Idle
    }
}

/// Render the settings overlay content
pub fn view(state: &SettingsState) -> Element<'_, Message> {
    let applying = state.phase == SettingsPhase::Applying;

    let title = text("Settings").size(24);
    let mut close_btn = button(text("×").size(18)).style(button::secondary);
    if !applying {
        close_btn = close_btn.on_press(Message::Settings(SettingsMessage::Cancel));
    }

    let header = row![title, Space::new().width(Length::Fill), close_btn]
        .align_y(Alignment::Center)
        .width(Length::Fill);

    let mut cancel_btn = button(text("Cancel")).style(button::secondary);
    let mut apply_btn = button(text("Apply")).style(button::primary);
    if !applying {
        cancel_btn = cancel_btn.on_press(Message::Settings(SettingsMessage::Cancel));
        apply_btn = apply_btn.on_press(Message::Settings(SettingsMessage::Apply));
    }

    let status: Element<'_, Message> = if applying {
        text("Applying...").size(14).color(theme::TEXT_DIM).into()
    } else {
        Space::new().into()
    };

    let actions = row![status, Space::new().width(Length::Fill), cancel_btn, apply_btn]
        .spacing(10)
        .align_y(Alignment::Center)
        .width(Length::Fill);

    let content = column![
        header,
        view_device_section(state, applying),
        view_resolution_section(state, applying),
        actions,
    ]
    .spacing(20)
    .width(Length::Fixed(420.0));

    container(content)
        .padding(30)
        .style(container::rounded_box)
        .into()
}

/// Input device picker
fn view_device_section(state: &SettingsState, applying: bool) -> Element<'_, Message> {
    let picker: Element<'_, Message> = if applying {
        text(state.selected_device.clone()).size(16).into()
    } else {
        pick_list(
            state.devices.clone(),
            Some(state.selected_device.clone()),
            |name| Message::Settings(SettingsMessage::DeviceSelected(name)),
        )
        .width(Length::Fill)
        .into()
    };

    column![text("Device").size(16), picker].spacing(8).into()
}

/// Resolution slider with a live numeric label
fn view_resolution_section(state: &SettingsState, applying: bool) -> Element<'_, Message> {
    let label = text(format!("{:.1}x", state.multiplier)).size(14);

    let control: Element<'_, Message> = if applying {
        label.into()
    } else {
        let position_slider = slider(0.0..=1.0, state.position, |p| {
            Message::Settings(SettingsMessage::PositionChanged(p))
        })
        .step(0.001);

        row![position_slider, label]
            .spacing(10)
            .align_y(Alignment::Center)
            .into()
    };

    column![text("Resolution").size(16), control].spacing(8).into()
}
