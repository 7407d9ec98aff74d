pub mod raster;
pub mod roi;
pub mod stroke;
pub mod surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Opaque fill applied to the surface when the first stroke of a session
/// begins. Kept as presentation state so the ink alpha scan stays meaningful.
pub const SURFACE_FILL: Color = Color::rgb(0, 0, 0);
