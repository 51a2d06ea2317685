//! Rasterizes [`DrawCommand`]s onto a frame.

use image::RgbImage;
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

use crate::types::{DrawCommand, FrameResult, Point};

/// Copy of `frame` with every draw command of `result` applied.
pub fn annotate(frame: &RgbImage, result: &FrameResult) -> RgbImage {
    let mut canvas = frame.clone();
    draw(&mut canvas, &result.draw_commands);
    canvas
}

/// Draw commands in order; later commands paint over earlier ones.
pub fn draw(canvas: &mut RgbImage, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Line { from, to, color, thickness } => {
                thick_line(canvas, *from, *to, (*color).into(), *thickness);
            }
            DrawCommand::Circle { center, radius, color, thickness } => {
                let c = (center.x.round() as i32, center.y.round() as i32);
                let (r, t) = (*radius as i32, (*thickness).max(1) as i32);
                for k in 0..t {
                    let ring = r - t / 2 + k;
                    if ring > 0 {
                        draw_hollow_circle_mut(canvas, c, ring, (*color).into());
                    }
                }
            }
            DrawCommand::Polyline { points, color, thickness } => match points.as_slice() {
                [] => {}
                [only] => thick_line(canvas, *only, *only, (*color).into(), *thickness),
                _ => {
                    let closing = std::iter::once((points[points.len() - 1], points[0]));
                    for (a, b) in points.windows(2).map(|w| (w[0], w[1])).chain(closing) {
                        thick_line(canvas, a, b, (*color).into(), *thickness);
                    }
                }
            },
        }
    }
}

/// Parallel one pixel strokes, offset across the dominant direction.
fn thick_line(canvas: &mut RgbImage, from: Point, to: Point, color: image::Rgb<u8>, thickness: u32) {
    let t = thickness.max(1);
    let horizontal = (to.x - from.x).abs() >= (to.y - from.y).abs();
    for k in 0..t {
        let offset = k as f32 - (t - 1) as f32 / 2.0;
        let (dx, dy) = if horizontal { (0.0, offset) } else { (offset, 0.0) };
        draw_line_segment_mut(
            canvas,
            (from.x as f32 + dx, from.y as f32 + dy),
            (to.x as f32 + dx, to.y as f32 + dy),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    #[test]
    fn test_empty_commands_leave_frame_untouched() {
        let frame = RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]));
        let out = annotate(&frame, &FrameResult::no_hand());
        assert_eq!(out, frame);
    }

    #[test]
    fn test_line_thickness() {
        let mut canvas = RgbImage::new(20, 20);
        draw(
            &mut canvas,
            &[DrawCommand::Line {
                from: Point::new(2.0, 10.0),
                to: Point::new(17.0, 10.0),
                color: Rgb::WHITE,
                thickness: 2,
            }],
        );
        let lit = canvas.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(lit >= 2 * 16, "only {lit} pixels drawn");
        assert_eq!(canvas.get_pixel(10, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_polyline_is_closed() {
        let mut canvas = RgbImage::new(20, 20);
        let square = vec![
            Point::new(2.0, 2.0),
            Point::new(12.0, 2.0),
            Point::new(12.0, 12.0),
            Point::new(2.0, 12.0),
        ];
        draw(&mut canvas, &[DrawCommand::Polyline { points: square, color: Rgb::GREEN, thickness: 1 }]);
        // closing edge from (2, 12) back to (2, 2)
        assert_eq!(canvas.get_pixel(2, 7).0, [0, 255, 0]);
        assert_eq!(canvas.get_pixel(7, 7).0, [0, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_geometry_is_clipped() {
        let mut canvas = RgbImage::new(8, 8);
        draw(
            &mut canvas,
            &[
                DrawCommand::Circle { center: Point::new(-20.0, 3.0), radius: 4, color: Rgb::RED, thickness: 2 },
                DrawCommand::Line { from: Point::new(-5.0, -5.0), to: Point::new(30.0, 30.0), color: Rgb::RED, thickness: 1 },
            ],
        );
        assert_eq!(canvas.get_pixel(4, 4).0, [255, 0, 0]);
    }
}
