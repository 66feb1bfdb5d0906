use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building or showing a thermometer
#[derive(Debug, Error)]
pub enum ThermometerError {
    #[error("temperature range is empty: min {min} must be below max {max}")]
    DegenerateRange { min: i32, max: i32 },

    #[error("temperature range {min}..{max} does not fit a Fahrenheit scale")]
    RangeOutOfBounds { min: i32, max: i32 },

    #[error("no usable label font found; pass one with --font")]
    FontNotFound,

    #[error("{0} is not a font rusttype can parse")]
    InvalidFont(PathBuf),

    #[error("failed to read font: {0}")]
    Io(#[from] std::io::Error),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("pixel buffer resize failed: {0}")]
    Texture(#[from] pixels::TextureError),
}
