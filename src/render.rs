use crate::config::palette;
use crate::layout::LayoutGeometry;
use crate::scene::Surface;

/// Unit glyphs drawn in the top corners of the body.
pub const PRIMARY_UNIT: &str = "C";
pub const SECONDARY_UNIT: &str = "F";

/// Paint the thermometer described by `geometry` showing `value`.
pub fn render<S: Surface + ?Sized>(surface: &mut S, geometry: &LayoutGeometry, value: f64) {
    let body = geometry.body;
    let mercury = geometry.mercury;

    surface.fill_round_rect(body, geometry.corner_arc, palette::BODY);
    surface.fill_rect(mercury, palette::MERCURY_TRACK);
    surface.fill_rect(geometry.mercury_fill(value), palette::MERCURY);
    surface.fill_ellipse(geometry.bulb(), palette::MERCURY);

    let size = geometry.font_size;
    let line_height = surface.line_height(size);
    let inset = geometry.corner_arc / 2.0;

    // Unit names
    let unit_baseline = body.y + line_height / 2.0 + inset;
    surface.draw_text(body.x + inset, unit_baseline, PRIMARY_UNIT, size, palette::TEXT);
    let secondary_x = body.right() - surface.text_width(SECONDARY_UNIT, size) - inset;
    surface.draw_text(secondary_x, unit_baseline, SECONDARY_UNIT, size, palette::TEXT);

    // Keep the primary labels clear of the column whatever their width
    let scale = geometry.scale;
    let primary_offset = surface
        .text_width(&scale.max_primary().to_string(), size)
        .max(surface.text_width(&scale.min_primary().to_string(), size));
    let primary_x = mercury.center_x() - mercury.width - primary_offset;
    for (n, label) in scale.primary_labels().enumerate() {
        let baseline = mercury.y + n as f64 * geometry.primary_spacing + line_height / 2.0;
        surface.draw_text(primary_x, baseline, &label.to_string(), size, palette::TEXT);
    }

    let secondary_x = mercury.center_x() + mercury.width;
    for (n, label) in scale.secondary_labels().enumerate() {
        let baseline = mercury.y
            + n as f64 * geometry.secondary_spacing
            + geometry.secondary_leading_offset
            + line_height / 2.0;
        surface.draw_text(secondary_x, baseline, &label.to_string(), size, palette::TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, DualScale};
    use crate::scene::{DrawCommand, MonospaceMetrics, Scene, TextMetrics};
    use approx::assert_relative_eq;

    fn geometry() -> LayoutGeometry {
        compute_layout(400.0, 400.0, &DualScale::new(-40, 50).unwrap())
    }

    fn texts(scene: &Scene<MonospaceMetrics>) -> Vec<(f64, f64, String)> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    x, baseline, text, ..
                } => Some((*x, *baseline, text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn paints_shapes_in_order() {
        let g = geometry();
        let mut scene = Scene::new(MonospaceMetrics);
        render(&mut scene, &g, 5.0);
        let shapes: Vec<&DrawCommand> = scene.commands().iter().take(4).collect();
        assert!(matches!(shapes[0], DrawCommand::RoundRect { rect, .. } if *rect == g.body));
        assert!(matches!(shapes[1], DrawCommand::Rect { rect, color } if *rect == g.mercury && *color == palette::MERCURY_TRACK));
        assert!(matches!(shapes[2], DrawCommand::Rect { color, .. } if *color == palette::MERCURY));
        assert!(matches!(shapes[3], DrawCommand::Ellipse { rect, .. } if *rect == g.bulb()));
        // two unit glyphs, ten Celsius and seventeen Fahrenheit labels
        assert_eq!(texts(&scene).len(), 2 + 10 + 17);
    }

    fn painted_fill(value: f64) -> f64 {
        let g = geometry();
        let mut scene = Scene::new(MonospaceMetrics);
        render(&mut scene, &g, value);
        match &scene.commands()[2] {
            DrawCommand::Rect { rect, .. } => rect.height,
            other => panic!("expected the mercury fill, got {other:?}"),
        }
    }

    #[test]
    fn fill_height_follows_value() {
        let full = geometry().mercury.height;
        assert_eq!(painted_fill(-40.0), 0.0);
        assert_relative_eq!(painted_fill(50.0), full);
        assert_eq!(painted_fill(-273.0), 0.0);
        assert_relative_eq!(painted_fill(1000.0), full);
    }

    #[test]
    fn unit_glyphs_sit_in_the_top_corners() {
        let g = geometry();
        let mut scene = Scene::new(MonospaceMetrics);
        render(&mut scene, &g, 0.0);
        let labels = texts(&scene);
        let (cx, cy, c) = &labels[0];
        let (fx, fy, f) = &labels[1];
        assert_eq!(c, PRIMARY_UNIT);
        assert_eq!(f, SECONDARY_UNIT);
        assert_eq!(cy, fy);
        assert_relative_eq!(*cx, g.body.x + g.corner_arc / 2.0);
        let f_width = MonospaceMetrics.text_width(SECONDARY_UNIT, g.font_size);
        assert_relative_eq!(*fx + f_width + g.corner_arc / 2.0, g.body.right(), epsilon = 1e-9);
        assert!(g.body.contains(*cx, *cy) && g.body.contains(*fx, *fy));
    }

    #[test]
    fn decade_labels_are_spaced_down_the_column() {
        let g = geometry();
        let mut scene = Scene::new(MonospaceMetrics);
        render(&mut scene, &g, 0.0);
        let labels = texts(&scene);
        let half_line = 1.2 * g.font_size / 2.0;

        let celsius = &labels[2..12];
        assert_eq!(celsius[0].2, "50");
        assert_eq!(celsius[9].2, "-40");
        assert_relative_eq!(celsius[0].1, g.mercury.y + half_line, epsilon = 1e-9);
        assert_relative_eq!(celsius[9].1, g.mercury.bottom() + half_line, epsilon = 1e-9);
        // right-aligned against the widest of "50" and "-40"
        let widest = 3.0 * 0.6 * g.font_size;
        assert_relative_eq!(
            celsius[0].0,
            g.mercury.center_x() - g.mercury.width - widest,
            epsilon = 1e-9
        );

        let fahrenheit = &labels[12..];
        assert_eq!(fahrenheit[0].2, "120");
        assert_eq!(fahrenheit[16].2, "-40");
        assert_relative_eq!(
            fahrenheit[0].1,
            g.mercury.y + g.secondary_leading_offset + half_line,
            epsilon = 1e-9
        );
        assert!(fahrenheit.iter().all(|(x, _, _)| *x > g.mercury.right()));
    }
}
