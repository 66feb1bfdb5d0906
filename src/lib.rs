// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod config;
pub mod easing;
pub mod error;
pub mod layout;
pub mod render;
pub mod scene;
pub mod slider;
pub mod widget;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

pub use canvas::{Canvas, LabelFont};
pub use config::{palette, Color, ThermometerConfig};
pub use easing::{step, EasingController, Phase, Step, ThermometerState};
pub use error::ThermometerError;
pub use layout::{compute_layout, DualScale, LayoutCache, LayoutGeometry, Rect};
pub use render::render;
pub use scene::{DrawCommand, MonospaceMetrics, Scene, Surface, TextMetrics};
pub use slider::Slider;
pub use widget::ThermometerWidget;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for driving a running thermometer from another thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermometerCommand {
    /// Ease toward a new temperature
    Seek(f64),
    /// Close the window
    Close,
}

/// Main thermometer struct - the primary public interface
#[derive(Debug, Clone)]
pub struct Thermometer {
    config: ThermometerConfig,
    scale: DualScale,
    widget: ThermometerWidget,
}

impl Thermometer {
    /// Fails when the configured range is empty or inverted.
    pub fn new(config: ThermometerConfig) -> Result<Self, ThermometerError> {
        let scale = DualScale::new(config.range.0, config.range.1)?;
        let widget = ThermometerWidget::new(scale, config.initial_value());
        Ok(Self {
            config,
            scale,
            widget,
        })
    }

    pub fn config(&self) -> &ThermometerConfig {
        &self.config
    }

    pub fn scale(&self) -> &DualScale {
        &self.scale
    }

    /// Set the target the window will ease toward once shown.
    pub fn seek(&mut self, target: f64) {
        self.widget.seek(target);
    }

    pub fn value(&self) -> f64 {
        self.widget.value()
    }

    pub fn show(&mut self) -> Result<(), ThermometerError> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<ThermometerCommand>,
    ) -> Result<(), ThermometerError> {
        self.run_window(Some(receiver))
    }

    fn run_window(
        &mut self,
        receiver: Option<Receiver<ThermometerCommand>>,
    ) -> Result<(), ThermometerError> {
        let font = LabelFont::discover(self.config.font_path.as_deref())?;

        let event_loop = EventLoopBuilder::<ThermometerCommand>::with_user_event().build()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.window_width),
                f64::from(self.config.window_height),
            ))
            .with_min_inner_size(LogicalSize::new(
                f64::from(self.config.min_window_width),
                f64::from(self.config.min_window_height),
            ))
            .with_resizable(true)
            .build(&event_loop)?;
        let window = Arc::new(window);
        let handle = Arc::clone(&window);

        if let Some(receiver) = receiver {
            forward_commands(receiver, event_loop.create_proxy());
        }

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        info!(
            width = size.width,
            height = size.height,
            title = %self.config.title,
            "thermometer window open"
        );

        let (min, max) = self.config.range;
        let initial = self.widget.target().round() as i32;
        let slider = Slider::new(min, max, initial, self.config.slider_caption.clone());
        let mut app = App::new(
            &mut self.widget,
            slider,
            self.config.slider_height,
        );
        app.resize(size, window.scale_factor(), &font);

        let tick_interval = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut next_tick = Instant::now() + tick_interval;
        let mut cursor_x = 0.0;
        let mut cursor_y = 0.0;

        event_loop.run(move |event, window_target| {
            let mut started = false;
            match event {
                Event::UserEvent(ThermometerCommand::Seek(target)) => {
                    debug!(target, "seek command");
                    started |= app.seek(target);
                    handle.request_redraw();
                }
                Event::UserEvent(ThermometerCommand::Close) => window_target.exit(),
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        let resized = pixels
                            .resize_buffer(new_size.width, new_size.height)
                            .and_then(|()| pixels.resize_surface(new_size.width, new_size.height));
                        if let Err(err) = resized {
                            error!(%err, "failed to resize pixel surface");
                            window_target.exit();
                            return;
                        }
                        app.resize(new_size, handle.scale_factor(), &font);
                        handle.request_redraw();
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor_x = position.x;
                        cursor_y = position.y;
                        if let Some(target) = app.slider.drag(cursor_x) {
                            started |= app.widget.on_slider_changed(target);
                            handle.request_redraw();
                        }
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => match state {
                        ElementState::Pressed => {
                            if let Some(target) = app.slider.press(cursor_x, cursor_y) {
                                started |= app.widget.on_slider_changed(target);
                            }
                            handle.request_redraw();
                        }
                        ElementState::Released => app.slider.release(),
                    },
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state != ElementState::Pressed {
                            return;
                        }
                        let delta = match event.logical_key {
                            Key::Named(NamedKey::ArrowLeft | NamedKey::ArrowDown) => -1,
                            Key::Named(NamedKey::ArrowRight | NamedKey::ArrowUp) => 1,
                            Key::Named(NamedKey::PageDown) => -10,
                            Key::Named(NamedKey::PageUp) => 10,
                            _ => return,
                        };
                        if let Some(target) = app.slider.step(delta) {
                            started |= app.widget.on_slider_changed(target);
                            handle.request_redraw();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let size = handle.inner_size();
                        let frame = pixels.frame_mut();
                        let mut canvas =
                            Canvas::new(frame, size.width as usize, size.height as usize)
                                .with_font(&font);
                        app.paint(&mut canvas, &font);
                        if let Err(err) = pixels.render() {
                            error!(%err, "render failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if app.widget.is_animating() {
                        let now = Instant::now();
                        if now >= next_tick {
                            if app.widget.on_tick() {
                                handle.request_redraw();
                            }
                            next_tick += tick_interval;
                            // Do not try to catch up after a stall
                            if next_tick < now {
                                next_tick = now + tick_interval;
                            }
                        }
                    }
                }
                _ => {}
            }

            if started {
                next_tick = Instant::now() + tick_interval;
            }
            window_target.set_control_flow(if app.widget.is_animating() {
                ControlFlow::WaitUntil(next_tick)
            } else {
                ControlFlow::Wait
            });
        })?;

        Ok(())
    }
}

// ============================================================================
// INTERNAL IMPLEMENTATION
// ============================================================================

/// Everything painted into the window: the slider strip on top and the
/// thermometer filling the rest.
struct App<'w> {
    widget: &'w mut ThermometerWidget,
    slider: Slider,
    slider_height: f64,
    strip: f64,
}

impl<'w> App<'w> {
    fn new(widget: &'w mut ThermometerWidget, slider: Slider, slider_height: f64) -> Self {
        Self {
            widget,
            slider,
            slider_height,
            strip: slider_height,
        }
    }

    /// Retarget from outside the window; the knob follows the new target.
    fn seek(&mut self, target: f64) -> bool {
        self.slider.set_value(target.round() as i32);
        self.widget.seek(target)
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64, metrics: &LabelFont) {
        let width = f64::from(size.width);
        let height = f64::from(size.height);
        self.strip = (self.slider_height * scale_factor).min(height);
        self.slider.layout(width, self.strip, metrics);
        self.widget.on_resize(width, height - self.strip);
    }

    fn paint(&mut self, canvas: &mut Canvas, metrics: &LabelFont) {
        let mut scene = Scene::new(metrics);
        scene.add_command(DrawCommand::Clear(palette::BACKGROUND));
        self.slider.paint(&mut scene);
        scene.replay(canvas);

        let mut scene = Scene::new(metrics);
        self.widget.paint(&mut scene);
        canvas.set_origin(0.0, self.strip);
        scene.replay(canvas);
        canvas.set_origin(0.0, 0.0);
    }
}

/// Relay commands from a plain channel into the event loop, which sleeps
/// between ticks and only wakes for its own events.
fn forward_commands(receiver: Receiver<ThermometerCommand>, proxy: EventLoopProxy<ThermometerCommand>) {
    thread::spawn(move || {
        for command in receiver {
            if proxy.send_event(command).is_err() {
                debug!("event loop closed, dropping thermometer commands");
                break;
            }
        }
    });
}
