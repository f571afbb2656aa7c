//! Live signal scope canvas
//!
//! Paints the latest sample batch as a single polyline across the widget
//! bounds. There is deliberately no geometry cache: every frame repaints
//! from the current batch and the current bounds, so the trace can never go
//! stale and a resize takes effect on the next repaint.

use iced::mouse;
use iced::widget::canvas::{Canvas, Frame, Geometry, Path, Program, Stroke};
use iced::{Element, Length, Point, Rectangle, Size, Theme};

use crate::theme;

/// Map samples onto pixel coordinates for a surface of the given size.
///
/// Sample index runs left to right across the full width. An amplitude of
/// -1 maps to the top edge, +1 to the bottom edge. Returns `None` when
/// there is nothing to plot: fewer than two samples, or a degenerate
/// surface.
pub fn plot_points(samples: &[f32], size: Size) -> Option<Vec<Point>> {
    if samples.len() < 2 || size.width <= 0.0 || size.height <= 0.0 {
        return None;
    }

    let dx = size.width / (samples.len() - 1) as f32;
    let points = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| Point::new(i as f32 * dx, (s + 1.0) * size.height / 2.0))
        .collect();

    Some(points)
}

/// Canvas program for the scope trace.
pub struct Scope<'a> {
    samples: &'a [f32],
}

impl<'a> Scope<'a> {
    pub fn new(samples: &'a [f32]) -> Self {
        Self { samples }
    }
}

impl<'a, Message> Program<Message> for Scope<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), theme::SCOPE_BACKGROUND);

        let points = match plot_points(self.samples, bounds.size()) {
            Some(points) => points,
            None => return vec![frame.into_geometry()],
        };

        let trace = Path::new(|builder| {
            builder.move_to(points[0]);
            for point in &points[1..] {
                builder.line_to(*point);
            }
        });

        frame.stroke(
            &trace,
            Stroke::default()
                .with_color(theme::SCOPE_TRACE)
                .with_width(1.5),
        );

        vec![frame.into_geometry()]
    }
}

/// Build a scope canvas element that fills its container.
pub fn scope<'a, Message: 'a>(samples: &'a [f32]) -> Element<'a, Message> {
    Canvas::new(Scope::new(samples))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
