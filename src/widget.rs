use tracing::debug;

use crate::easing::EasingController;
use crate::layout::{DualScale, LayoutCache, LayoutGeometry};
use crate::render::render;
use crate::scene::Surface;

/// The animated thermometer, independent of any windowing toolkit.
///
/// The host forwards its size, slider changes and timer ticks here and asks
/// the widget to paint whenever a tick reports that the value moved.
#[derive(Debug, Clone)]
pub struct ThermometerWidget {
    scale: DualScale,
    controller: EasingController,
    layout: LayoutCache,
    size: (f64, f64),
}

impl ThermometerWidget {
    pub fn new(scale: DualScale, initial: f64) -> Self {
        Self {
            scale,
            controller: EasingController::new(initial),
            layout: LayoutCache::new(),
            size: (0.0, 0.0),
        }
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        if self.size != (width, height) {
            debug!(width, height, "thermometer resized");
            self.size = (width, height);
            self.layout.invalidate();
        }
    }

    /// Returns `true` when the host has to start its tick source.
    pub fn on_slider_changed(&mut self, target: i32) -> bool {
        self.seek(f64::from(target))
    }

    /// Returns `true` when the host has to start its tick source.
    pub fn seek(&mut self, target: f64) -> bool {
        self.controller.seek(target)
    }

    /// Returns whether a repaint is needed.
    pub fn on_tick(&mut self) -> bool {
        self.controller.tick()
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    pub fn value(&self) -> f64 {
        self.controller.value()
    }

    pub fn target(&self) -> f64 {
        self.controller.target()
    }

    pub fn scale(&self) -> &DualScale {
        &self.scale
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Geometry for the current size, laid out again only after a resize.
    pub fn geometry(&mut self) -> &LayoutGeometry {
        let (width, height) = self.size;
        self.layout.geometry(width, height, &self.scale)
    }

    pub fn layout_recomputations(&self) -> usize {
        self.layout.recomputations()
    }

    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let value = self.controller.value();
        let geometry = self.geometry();
        render(surface, geometry, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MonospaceMetrics, Scene};

    fn widget() -> ThermometerWidget {
        ThermometerWidget::new(DualScale::new(-40, 50).unwrap(), -40.0)
    }

    #[test]
    fn slider_change_starts_animation_once() {
        let mut w = widget();
        assert!(w.on_slider_changed(20));
        assert!(!w.on_slider_changed(25));
        assert_eq!(w.target(), 25.0);
        assert!(w.on_tick());
        assert!(w.value() > -40.0);
    }

    #[test]
    fn paint_lays_out_only_after_resize() {
        let mut w = widget();
        w.on_resize(100.0, 400.0);
        let mut scene = Scene::new(MonospaceMetrics);
        w.paint(&mut scene);
        w.paint(&mut scene);
        assert_eq!(w.layout_recomputations(), 1);

        // same size again is not a resize
        w.on_resize(100.0, 400.0);
        w.paint(&mut scene);
        assert_eq!(w.layout_recomputations(), 1);

        w.on_resize(200.0, 400.0);
        w.paint(&mut scene);
        assert_eq!(w.layout_recomputations(), 2);
    }

    #[test]
    fn ticks_do_not_touch_layout() {
        let mut w = widget();
        w.on_resize(100.0, 400.0);
        let before = w.geometry().clone();
        w.seek(50.0);
        for _ in 0..20 {
            w.on_tick();
        }
        assert_eq!(w.geometry(), &before);
        assert_eq!(w.layout_recomputations(), 1);
    }
}
