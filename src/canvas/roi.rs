use crate::canvas::surface::PixelSurface;

/// Tight bounding box of all drawn ink, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl InkBounds {
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) as f32 / 2.0,
            (self.min_y + self.max_y) as f32 / 2.0,
        )
    }
}

/// Scan every pixel's alpha channel and widen the box around the non-zero
/// ones. `None` when the surface holds no ink at all; callers must handle
/// that case instead of receiving an inverted box. Runs once per submission,
/// so the full O(w*h) scan is fine.
pub fn ink_bounds(surface: &PixelSurface) -> Option<InkBounds> {
    let width = surface.width();
    let pixels = surface.pixels();

    let mut bounds: Option<InkBounds> = None;
    for (index, px) in pixels.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = index as u32 % width;
        let y = index as u32 / width;
        bounds = Some(match bounds {
            None => InkBounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => InkBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    const INK: Color = Color::rgb(255, 255, 255);

    #[test]
    fn empty_surface_yields_no_bounds() {
        let surface = PixelSurface::new(32, 32);
        assert_eq!(ink_bounds(&surface), None);
    }

    #[test]
    fn background_fill_is_not_ink() {
        let mut surface = PixelSurface::new(32, 32);
        surface.set_background(crate::canvas::SURFACE_FILL);
        assert_eq!(ink_bounds(&surface), None);
    }

    #[test]
    fn bounds_match_inked_rectangle_exactly() {
        let mut surface = PixelSurface::new(200, 200);
        for y in 50..=120 {
            for x in 50..=150 {
                surface.stamp((x, y), INK, 1);
            }
        }

        let bounds = ink_bounds(&surface).expect("ink present");
        assert_eq!(
            bounds,
            InkBounds {
                min_x: 50,
                min_y: 50,
                max_x: 150,
                max_y: 120,
            }
        );
        assert_eq!(bounds.center(), (100.0, 85.0));
    }

    #[test]
    fn single_pixel_bounds_collapse_to_that_pixel() {
        let mut surface = PixelSurface::new(32, 32);
        surface.stamp((7, 9), INK, 1);

        let bounds = ink_bounds(&surface).expect("ink present");
        assert_eq!(
            bounds,
            InkBounds {
                min_x: 7,
                min_y: 9,
                max_x: 7,
                max_y: 9,
            }
        );
        assert_eq!(bounds.center(), (7.0, 9.0));
    }
}
