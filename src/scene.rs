//! Drawing seam between the renderer and whatever puts pixels on screen.
//!
//! The renderer talks to a [`Surface`]. A [`Scene`] is a retained-mode
//! surface: it records [`DrawCommand`]s and later replays them onto a
//! [`Canvas`](crate::canvas::Canvas).

use crate::canvas::Canvas;
use crate::config::Color;
use crate::layout::Rect;

/// Font measurements the layout of labels depends on
pub trait TextMetrics {
    /// Horizontal advance of `text` at `size` pixels.
    fn text_width(&self, text: &str, size: f64) -> f64;

    /// Distance between consecutive baselines at `size` pixels.
    fn line_height(&self, size: f64) -> f64;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        (**self).text_width(text, size)
    }

    fn line_height(&self, size: f64) -> f64 {
        (**self).line_height(size)
    }
}

/// The 2D primitives the thermometer and slider are painted with
pub trait Surface: TextMetrics {
    /// Rounded rectangle; `arc` is the extent of each corner's rounding.
    fn fill_round_rect(&mut self, rect: Rect, arc: f64, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Ellipse inscribed in `rect`.
    fn fill_ellipse(&mut self, rect: Rect, color: Color);

    /// Text starting at `x` with its baseline on `baseline`.
    fn draw_text(&mut self, x: f64, baseline: f64, text: &str, size: f64, color: Color);

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    RoundRect {
        rect: Rect,
        arc: f64,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Ellipse {
        rect: Rect,
        color: Color,
    },
    Text {
        x: f64,
        baseline: f64,
        text: String,
        size: f64,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
        color: Color,
    },
}

/// Recorded draw commands, measured with `M`
pub struct Scene<M> {
    metrics: M,
    commands: Vec<DrawCommand>,
}

impl<M: TextMetrics> Scene<M> {
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Paint every recorded command onto `canvas`, in order.
    pub fn replay(&self, canvas: &mut Canvas) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::RoundRect { rect, arc, color } => {
                    canvas.fill_round_rect(*rect, *arc, *color)
                }
                DrawCommand::Rect { rect, color } => canvas.fill_rect(*rect, *color),
                DrawCommand::Ellipse { rect, color } => canvas.fill_ellipse(*rect, *color),
                DrawCommand::Text {
                    x,
                    baseline,
                    text,
                    size,
                    color,
                } => canvas.draw_text(*x, *baseline, text, *size, *color),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => canvas.draw_line(*x0, *y0, *x1, *y1, *thickness, *color),
            }
        }
    }
}

impl<M: TextMetrics> TextMetrics for Scene<M> {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        self.metrics.text_width(text, size)
    }

    fn line_height(&self, size: f64) -> f64 {
        self.metrics.line_height(size)
    }
}

impl<M: TextMetrics> Surface for Scene<M> {
    fn fill_round_rect(&mut self, rect: Rect, arc: f64, color: Color) {
        self.add_command(DrawCommand::RoundRect { rect, arc, color });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.add_command(DrawCommand::Rect { rect, color });
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) {
        self.add_command(DrawCommand::Ellipse { rect, color });
    }

    fn draw_text(&mut self, x: f64, baseline: f64, text: &str, size: f64, color: Color) {
        self.add_command(DrawCommand::Text {
            x,
            baseline,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color) {
        self.add_command(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            thickness,
            color,
        });
    }
}

/// Fixed-pitch metrics: every character advances `0.6 * size`, lines are
/// `1.2 * size` apart. Lets layouts be checked without loading a font.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMetrics;

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().count() as f64 * 0.6 * size
    }

    fn line_height(&self, size: f64) -> f64 {
        1.2 * size
    }
}
