//! Horizontal integer slider that sets the thermometer's target.

use crate::config::palette;
use crate::layout::{Rect, DECADE};
use crate::scene::{Surface, TextMetrics};

/// Caption and tick-label size relative to the strip height.
const FONT_FACTOR: f64 = 0.22;
const PADDING: f64 = 10.0;
const TRACK_THICKNESS: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct Slider {
    min: i32,
    max: i32,
    value: i32,
    caption: String,
    bounds: Rect,
    track_start: f64,
    track_end: f64,
    font_size: f64,
    dragging: bool,
}

impl Slider {
    pub fn new(min: i32, max: i32, value: i32, caption: impl Into<String>) -> Self {
        Self {
            min,
            max,
            value: value.clamp(min, max),
            caption: caption.into(),
            bounds: Rect::default(),
            track_start: 0.0,
            track_end: 0.0,
            font_size: 0.0,
            dragging: false,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Place the slider in a `width` by `height` strip at the top of the window.
    pub fn layout(&mut self, width: f64, height: f64, metrics: &impl TextMetrics) {
        self.bounds = Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0));
        self.font_size = height * FONT_FACTOR;
        let caption_width = metrics.text_width(&self.caption, self.font_size);
        self.track_start = (caption_width + 2.0 * PADDING).min(width / 2.0);
        self.track_end = (width - PADDING).max(self.track_start);
    }

    fn track_y(&self) -> f64 {
        self.bounds.y + self.bounds.height * 0.35
    }

    fn span(&self) -> f64 {
        f64::from(self.max) - f64::from(self.min)
    }

    fn x_of(&self, value: i32) -> f64 {
        let t = (f64::from(value) - f64::from(self.min)) / self.span();
        self.track_start + t * (self.track_end - self.track_start)
    }

    /// Nearest value to a pointer at `x`.
    pub fn value_at(&self, x: f64) -> i32 {
        let span = self.track_end - self.track_start;
        if span <= 0.0 {
            return self.value;
        }
        let t = ((x - self.track_start) / span).clamp(0.0, 1.0);
        let value = (f64::from(self.min) + t * self.span()).round();
        value.clamp(f64::from(self.min), f64::from(self.max)) as i32
    }

    /// `Some(new value)` only when the value actually changed.
    pub fn set_value(&mut self, value: i32) -> Option<i32> {
        let value = value.clamp(self.min, self.max);
        if value == self.value {
            None
        } else {
            self.value = value;
            Some(value)
        }
    }

    pub fn press(&mut self, x: f64, y: f64) -> Option<i32> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        self.dragging = true;
        self.set_value(self.value_at(x))
    }

    pub fn drag(&mut self, x: f64) -> Option<i32> {
        if self.dragging {
            self.set_value(self.value_at(x))
        } else {
            None
        }
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Keyboard nudge by `delta`.
    pub fn step(&mut self, delta: i32) -> Option<i32> {
        self.set_value(self.value.saturating_add(delta))
    }

    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.bounds.is_empty() {
            return;
        }
        let size = self.font_size;
        let line_height = surface.line_height(size);
        let track_y = self.track_y();

        surface.draw_text(
            PADDING,
            track_y + line_height / 4.0,
            &self.caption,
            size,
            palette::TEXT,
        );
        surface.draw_line(
            self.track_start,
            track_y,
            self.track_end,
            track_y,
            TRACK_THICKNESS,
            palette::SLIDER_TRACK,
        );

        // Major ticks on every multiple of ten
        let marks = self
            .min
            .checked_add((DECADE - self.min.rem_euclid(DECADE)) % DECADE)
            .map(|first| (first..=self.max).step_by(DECADE as usize));
        let tick_top = track_y + TRACK_THICKNESS * 2.0;
        let tick_bottom = tick_top + self.bounds.height * 0.12;
        for mark in marks.into_iter().flatten() {
            let x = self.x_of(mark);
            surface.draw_line(x, tick_top, x, tick_bottom, 1.0, palette::TEXT);
            let label = mark.to_string();
            let label_x = x - surface.text_width(&label, size) / 2.0;
            surface.draw_text(label_x, tick_bottom + line_height * 0.8, &label, size, palette::TEXT);
        }

        let knob = self.bounds.height * 0.25;
        let x = self.x_of(self.value);
        surface.fill_ellipse(
            Rect::new(x - knob / 2.0, track_y - knob / 2.0, knob, knob),
            palette::SLIDER_KNOB,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawCommand, MonospaceMetrics, Scene};

    fn slider() -> Slider {
        let mut slider = Slider::new(-40, 50, -40, "Degrees Celsius");
        slider.layout(400.0, 56.0, &MonospaceMetrics);
        slider
    }

    #[test]
    fn track_ends_map_to_range_ends() {
        let s = slider();
        assert_eq!(s.value_at(0.0), -40);
        assert_eq!(s.value_at(s.track_start), -40);
        assert_eq!(s.value_at(s.track_end), 50);
        assert_eq!(s.value_at(10_000.0), 50);
        let middle = (s.track_start + s.track_end) / 2.0;
        assert_eq!(s.value_at(middle), 5);
    }

    #[test]
    fn changes_are_reported_once() {
        let mut s = slider();
        assert_eq!(s.set_value(20), Some(20));
        assert_eq!(s.set_value(20), None);
        assert_eq!(s.step(1), Some(21));
        assert_eq!(s.set_value(500), Some(50));
        assert_eq!(s.step(1), None);
    }

    #[test]
    fn dragging_follows_the_pointer_until_release() {
        let mut s = slider();
        assert_eq!(s.press(s.track_end, 10.0), Some(50));
        assert_eq!(s.drag(s.track_start), Some(-40));
        s.release();
        assert_eq!(s.drag(s.track_end), None);
        // presses outside the strip are ignored
        assert_eq!(s.press(s.track_end, 500.0), None);
    }

    #[test]
    fn full_i32_range_maps_without_overflow() {
        let mut s = Slider::new(i32::MIN, i32::MAX, 0, "Degrees Celsius");
        s.layout(400.0, 56.0, &MonospaceMetrics);
        assert_eq!(s.value_at(s.track_start), i32::MIN);
        assert_eq!(s.value_at(s.track_end), i32::MAX);
        assert_eq!(s.press(s.track_end, 10.0), Some(i32::MAX));
        assert_eq!(s.step(1), None);

        let mut edge = Slider::new(i32::MAX - 3, i32::MAX, i32::MAX, "C");
        edge.layout(400.0, 56.0, &MonospaceMetrics);
        let mut scene = Scene::new(MonospaceMetrics);
        edge.paint(&mut scene);
        assert!(matches!(scene.commands().last(), Some(DrawCommand::Ellipse { .. })));
    }

    #[test]
    fn paints_a_tick_per_decade() {
        let s = slider();
        let mut scene = Scene::new(MonospaceMetrics);
        s.paint(&mut scene);
        let labels: Vec<String> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels[0], "Degrees Celsius");
        assert_eq!(labels[1..], ["-40", "-30", "-20", "-10", "0", "10", "20", "30", "40", "50"]);
        assert!(matches!(scene.commands().last(), Some(DrawCommand::Ellipse { .. })));
    }
}
