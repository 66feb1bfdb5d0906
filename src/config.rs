use std::path::PathBuf;

use bon::Builder;

/// Color representation for thermometer elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_rgb(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Fixed palette
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::from_rgb(0xEEEEEE);
    pub const BODY: Color = Color::WHITE;
    pub const MERCURY_TRACK: Color = Color::from_rgb(0xEEEEEE);
    pub const MERCURY: Color = Color::from_rgb(0x8A0707);
    pub const TEXT: Color = Color::BLACK;
    pub const SLIDER_TRACK: Color = Color::from_rgb(0xB8B8B8);
    pub const SLIDER_KNOB: Color = Color::from_rgb(0x5A7FA8);
}

/// Settings for the thermometer window
#[derive(Debug, Clone, Builder)]
pub struct ThermometerConfig {
    #[builder(default = "Thermometer".to_string())]
    pub title: String,
    /// Celsius range shown on the primary scale
    #[builder(default = (-40, 50))]
    pub range: (i32, i32),
    /// Starting temperature; the bottom of the range when unset
    pub initial: Option<f64>,

    // Window configuration
    #[builder(default = 400)]
    pub window_width: u32,
    #[builder(default = 450)]
    pub window_height: u32,
    #[builder(default = 400)]
    pub min_window_width: u32,
    #[builder(default = 400)]
    pub min_window_height: u32,
    /// Size the thermometer asks its container for
    #[builder(default = (100, 400))]
    pub preferred_widget_size: (u32, u32),
    #[builder(default = 30.0)]
    pub tick_rate: f64,

    // Slider strip above the thermometer, in logical pixels
    #[builder(default = 56.0)]
    pub slider_height: f64,
    #[builder(default = "Degrees Celsius".to_string())]
    pub slider_caption: String,

    /// Label font; common system locations are searched when unset
    pub font_path: Option<PathBuf>,
}

impl Default for ThermometerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ThermometerConfig {
    pub fn initial_value(&self) -> f64 {
        self.initial.unwrap_or(f64::from(self.range.0))
    }

    pub fn preferred_size(&self) -> (u32, u32) {
        self.preferred_widget_size
    }
}
