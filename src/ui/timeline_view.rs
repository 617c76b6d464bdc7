//! Timeline track with violation markers and the playback indicator.

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::core::marker::Activation;
use crate::timeline::TimelineSynchronizer;
use crate::ui::view_model::TimelineView;
use crate::ui::UiAction;

const TRACK_HEIGHT: f32 = 40.0;
/// Horizontal distance (points) within which a click hits a marker
const MARKER_HIT_RADIUS: f32 = 6.0;

const TRACK_FILL: Color32 = Color32::from_rgb(33, 37, 41);
const TRACK_BORDER: Color32 = Color32::from_rgb(73, 80, 87);
const MARKER_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const INDICATOR_COLOR: Color32 = Color32::from_rgb(13, 202, 240);

/// Map an x coordinate inside `rect` to a fraction of its width
pub fn fraction_at(rect: Rect, x: f32) -> f64 {
    if rect.width() <= 0.0 {
        return 0.0;
    }
    (((x - rect.left()) / rect.width()) as f64).clamp(0.0, 1.0)
}

fn x_at(rect: Rect, percent: f64) -> f32 {
    rect.left() + rect.width() * (percent / 100.0) as f32
}

/// Draw the track and report clicks as activations.
pub fn show(ui: &mut Ui, timeline: &TimelineSynchronizer, actions: &mut Vec<UiAction>) {
    let view = TimelineView::project(timeline);

    if view.is_empty {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.weak("No violations timeline available");
            ui.add_space(8.0);
        });
        return;
    }

    let (response, painter) = ui.allocate_painter(
        Vec2::new(ui.available_width(), TRACK_HEIGHT),
        Sense::click(),
    );
    let rect = response.rect;

    painter.rect_filled(rect, 4.0, TRACK_FILL);
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, TRACK_BORDER));

    for marker in &view.markers {
        let x = x_at(rect, marker.left_percent);
        painter.line_segment(
            [Pos2::new(x, rect.top() + 4.0), Pos2::new(x, rect.bottom() - 4.0)],
            Stroke::new(3.0, MARKER_COLOR),
        );
        painter.circle_filled(Pos2::new(x, rect.top() + 6.0), 4.0, MARKER_COLOR);
    }

    let indicator_x = x_at(rect, view.indicator_percent);
    painter.line_segment(
        [
            Pos2::new(indicator_x, rect.top()),
            Pos2::new(indicator_x, rect.bottom()),
        ],
        Stroke::new(2.0, INDICATOR_COLOR),
    );

    let tolerance = if rect.width() > 0.0 {
        (MARKER_HIT_RADIUS / rect.width()) as f64
    } else {
        0.0
    };

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let fraction = fraction_at(rect, pos.x);
            let activation = match timeline.nearest_marker(fraction, tolerance) {
                Some(marker) => Activation::Marker(marker.clone()),
                None => Activation::Track(fraction),
            };
            actions.push(UiAction::Activate(activation));
        }
    }

    let hovered = response
        .hover_pos()
        .and_then(|pos| timeline.nearest_marker(fraction_at(rect, pos.x), tolerance))
        .map(|m| crate::core::time::format_clock(m.timestamp()));

    if let Some(label) = hovered {
        painter.text(
            Pos2::new(rect.center().x, rect.bottom() - 8.0),
            Align2::CENTER_CENTER,
            label,
            FontId::monospace(10.0),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_at() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(400.0, 40.0));
        assert_eq!(fraction_at(rect, 100.0), 0.0);
        assert_eq!(fraction_at(rect, 300.0), 0.5);
        assert_eq!(fraction_at(rect, 500.0), 1.0);
        assert_eq!(fraction_at(rect, 20.0), 0.0);
        assert_eq!(fraction_at(rect, 900.0), 1.0);
    }

    #[test]
    fn test_fraction_at_degenerate_rect() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 0.0), Vec2::new(0.0, 40.0));
        assert_eq!(fraction_at(rect, 10.0), 0.0);
    }

    #[test]
    fn test_x_at() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(400.0, 40.0));
        assert_eq!(x_at(rect, 25.0), 200.0);
    }
}
