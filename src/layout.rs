//! Proportional layout of the thermometer.
//!
//! Every piece of geometry is derived from the widget size and the scale
//! bounds alone, so a layout can be cached per size and reused across frames.

use tracing::debug;

use crate::error::ThermometerError;

/// Width to height ratio of the body.
const RATIO: f64 = 2.0 / 4.0;
/// Distance from the widget edge, relative to the constraining dimension.
const MARGIN: f64 = 0.05;
/// Corner rounding of the body, relative to body width.
const CORNER: f64 = 0.2;
/// Gap between the body edge and the mercury column, relative to body height.
const PADDING: f64 = 0.1;
/// Width of the mercury column, relative to body width.
const MERCURY_WIDTH: f64 = 0.05;
/// Label font size at the reference body width.
const REFERENCE_FONT_SIZE: f64 = 12.0;
const REFERENCE_BODY_WIDTH: f64 = 200.0;
/// Both scales are labelled at multiples of this step.
pub const DECADE: i32 = 10;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    1.8 * c + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    5.0 * (f - 32.0) / 9.0
}

/// Axis-aligned rectangle in widget pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Celsius range of the widget and the Fahrenheit decades that fit inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualScale {
    min_primary: i32,
    max_primary: i32,
    min_secondary: i32,
    max_secondary: i32,
}

impl DualScale {
    /// Builds the scale for a Celsius range. The Fahrenheit bounds are rounded
    /// inward to whole decades so the secondary labels never leave the column.
    pub fn new(min: i32, max: i32) -> Result<Self, ThermometerError> {
        if min >= max {
            return Err(ThermometerError::DegenerateRange { min, max });
        }
        let decade = f64::from(DECADE);
        let min_secondary = (celsius_to_fahrenheit(f64::from(min)) / decade).ceil() * decade;
        let max_secondary = (celsius_to_fahrenheit(f64::from(max)) / decade).floor() * decade;
        let fits = |f: f64| f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX);
        if !fits(min_secondary) || !fits(max_secondary) {
            return Err(ThermometerError::RangeOutOfBounds { min, max });
        }
        Ok(Self {
            min_primary: min,
            max_primary: max,
            min_secondary: min_secondary as i32,
            max_secondary: max_secondary as i32,
        })
    }

    pub fn min_primary(&self) -> i32 {
        self.min_primary
    }

    pub fn max_primary(&self) -> i32 {
        self.max_primary
    }

    pub fn min_secondary(&self) -> i32 {
        self.min_secondary
    }

    pub fn max_secondary(&self) -> i32 {
        self.max_secondary
    }

    pub fn primary_span(&self) -> f64 {
        f64::from(self.max_primary) - f64::from(self.min_primary)
    }

    /// Whole secondary decades between the secondary bounds, zero or less
    /// when the range holds at most one Fahrenheit label.
    pub fn secondary_decades(&self) -> f64 {
        (f64::from(self.max_secondary) - f64::from(self.min_secondary)) / f64::from(DECADE)
    }

    /// Position of `value` along the primary range, clamped to `0.0..=1.0`.
    pub fn fraction(&self, value: f64) -> f64 {
        let min = f64::from(self.min_primary);
        let max = f64::from(self.max_primary);
        (value.clamp(min, max) - min) / self.primary_span()
    }

    /// Primary decade labels, top to bottom.
    pub fn primary_labels(&self) -> impl Iterator<Item = i32> {
        decades(self.max_primary, self.min_primary)
    }

    /// Secondary decade labels, top to bottom.
    pub fn secondary_labels(&self) -> impl Iterator<Item = i32> {
        decades(self.max_secondary, self.min_secondary)
    }
}

fn decades(from: i32, down_to: i32) -> impl Iterator<Item = i32> {
    (down_to..=from).rev().step_by(DECADE as usize)
}

/// Drawing geometry for one widget size
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGeometry {
    pub scale: DualScale,
    pub body: Rect,
    pub mercury: Rect,
    /// Extent of the rounded body corners; the painted corner radius is half.
    pub corner_arc: f64,
    /// Size of the mercury ball at the bottom of the column.
    pub bulb_diameter: f64,
    pub font_size: f64,
    pub primary_spacing: f64,
    pub secondary_spacing: f64,
    pub secondary_leading_offset: f64,
    pub secondary_trailing_offset: f64,
}

impl LayoutGeometry {
    /// The part of the mercury column filled at `value`, growing up from the bottom.
    pub fn mercury_fill(&self, value: f64) -> Rect {
        let height = self.mercury.height * self.scale.fraction(value);
        Rect::new(
            self.mercury.x,
            self.mercury.bottom() - height,
            self.mercury.width,
            height,
        )
    }

    /// Bounding square of the mercury ball, centred on the column's bottom.
    pub fn bulb(&self) -> Rect {
        let d = self.bulb_diameter;
        Rect::new(
            self.mercury.center_x() - d / 2.0,
            self.mercury.bottom() - d / 2.0,
            d,
            d,
        )
    }
}

/// Lay the thermometer out inside a `width` by `height` widget.
pub fn compute_layout(width: f64, height: f64, scale: &DualScale) -> LayoutGeometry {
    let width = width.max(0.0);
    let height = height.max(0.0);

    // Fit the body to whichever dimension is the tighter constraint
    let body = if width < height * RATIO {
        let margin = width * MARGIN;
        let body_width = width - 2.0 * margin;
        Rect::new(margin, margin, body_width, body_width / RATIO)
    } else {
        let margin = height * RATIO * MARGIN;
        Rect::new(
            margin,
            margin,
            height * RATIO - 2.0 * margin,
            height - 2.0 * margin,
        )
    };
    let corner_arc = body.width * CORNER;

    let mercury_width = body.width * MERCURY_WIDTH;
    let mercury = Rect::new(
        body.center_x() - mercury_width / 2.0,
        body.y + body.height * PADDING,
        mercury_width,
        body.height * (1.0 - 2.0 * PADDING),
    );
    let bulb_diameter = 2.0 * mercury_width;

    let font_size = REFERENCE_FONT_SIZE * body.width / REFERENCE_BODY_WIDTH;

    let decade = f64::from(DECADE);
    let primary_spacing = mercury.height / (scale.primary_span() / decade);

    // Fahrenheit decades do not line up with Celsius ones: shift the first
    // label down by what rounding cut off the top, and shorten the run by
    // what it cut off at the bottom.
    let secondary_leading_offset = map(
        f64::from(scale.max_primary) - fahrenheit_to_celsius(f64::from(scale.max_secondary)),
        0.0,
        decade,
        0.0,
        primary_spacing,
    );
    let secondary_trailing_offset = map(
        fahrenheit_to_celsius(f64::from(scale.min_secondary)) - f64::from(scale.min_primary),
        0.0,
        decade,
        0.0,
        primary_spacing,
    );
    let secondary_decades = scale.secondary_decades();
    let secondary_spacing = if secondary_decades > 0.0 {
        (mercury.height - (secondary_leading_offset + secondary_trailing_offset))
            / secondary_decades
    } else {
        0.0
    };

    debug!(width, height, font_size, "layout recomputed");

    LayoutGeometry {
        scale: *scale,
        body,
        mercury,
        corner_arc,
        bulb_diameter,
        font_size,
        primary_spacing,
        secondary_spacing,
        secondary_leading_offset,
        secondary_trailing_offset,
    }
}

/// Linearly re-map `value` from one range onto another.
fn map(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    (value - start1) / (stop1 - start1) * (stop2 - start2) + start2
}

/// Geometry memoized per widget size.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    cached: Option<((f64, f64), LayoutGeometry)>,
    recomputations: usize,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached geometry; the next lookup recomputes it.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Geometry for this size, recomputed only if the size differs from the
    /// cached one.
    pub fn geometry(&mut self, width: f64, height: f64, scale: &DualScale) -> &LayoutGeometry {
        if !matches!(&self.cached, Some((size, _)) if *size == (width, height)) {
            self.cached = None;
        }
        let recomputations = &mut self.recomputations;
        let (_, geometry) = self.cached.get_or_insert_with(|| {
            *recomputations += 1;
            ((width, height), compute_layout(width, height, scale))
        });
        geometry
    }

    /// How many times the layout has been computed.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}
