use crate::canvas::Color;

pub fn set_pixel_rgba(pixels: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }

    let idx = ((y as u32 * width + x as u32) * 4) as usize;
    if idx + 3 >= pixels.len() {
        return;
    }

    pixels[idx] = color.r;
    pixels[idx + 1] = color.g;
    pixels[idx + 2] = color.b;
    pixels[idx + 3] = color.a;
}

/// Stamp a filled circle. Stamping this brush along a segment yields round
/// caps and joins without any per-join work.
pub fn draw_brush(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    center: (i32, i32),
    color: Color,
    stroke_width: u32,
) {
    let radius = (stroke_width.saturating_sub(1) / 2) as i32;
    for y in (center.1 - radius)..=(center.1 + radius) {
        for x in (center.0 - radius)..=(center.0 + radius) {
            let dx = x - center.0;
            let dy = y - center.1;
            if dx * dx + dy * dy <= radius * radius {
                set_pixel_rgba(pixels, width, height, x, y, color);
            }
        }
    }
}

/// Bresenham walk from `start` to `end`, stamping the round brush at every
/// step.
pub fn draw_segment(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    stroke_width: u32,
) {
    let mut x0 = start.0;
    let mut y0 = start.1;
    let x1 = end.0;
    let y1 = end.1;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        draw_brush(pixels, width, height, (x0, y0), color, stroke_width);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::rgb(255, 255, 255);

    fn blank(width: u32, height: u32) -> Vec<u8> {
        vec![0; (width * height * 4) as usize]
    }

    fn alpha_at(pixels: &[u8], width: u32, x: u32, y: u32) -> u8 {
        pixels[((y * width + x) * 4 + 3) as usize]
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds_coordinates() {
        let mut pixels = blank(4, 4);
        set_pixel_rgba(&mut pixels, 4, 4, -1, 0, WHITE);
        set_pixel_rgba(&mut pixels, 4, 4, 0, -1, WHITE);
        set_pixel_rgba(&mut pixels, 4, 4, 4, 0, WHITE);
        set_pixel_rgba(&mut pixels, 4, 4, 0, 4, WHITE);
        assert!(pixels.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn segment_covers_both_endpoints() {
        let mut pixels = blank(16, 16);
        draw_segment(&mut pixels, 16, 16, (2, 3), (12, 9), WHITE, 3);
        assert_ne!(alpha_at(&pixels, 16, 2, 3), 0);
        assert_ne!(alpha_at(&pixels, 16, 12, 9), 0);
    }

    #[test]
    fn segment_is_bounds_safe_for_far_off_screen_endpoints() {
        let mut pixels = blank(8, 8);
        draw_segment(&mut pixels, 8, 8, (-100, -100), (100, 100), WHITE, 3);
        assert_eq!(pixels.len(), 8 * 8 * 4);
        assert_ne!(alpha_at(&pixels, 8, 4, 4), 0);
    }

    #[test]
    fn width_one_brush_writes_a_single_pixel() {
        let mut pixels = blank(8, 8);
        draw_brush(&mut pixels, 8, 8, (3, 3), WHITE, 1);
        let written = pixels.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert_eq!(written, 1);
    }
}
