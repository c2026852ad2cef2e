use glam::Vec2;

/// Latest pointer position in normalised surface coordinates.
///
/// The event handler writes it and the frame callback reads it; both receive
/// the same value explicitly instead of sharing a global. Pixel positions
/// arrive with the origin at the top-left and are flipped so `y = 0` is the
/// bottom edge, matching the surface coordinates the shader sees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    position: Vec2,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer move given in physical pixels.
    ///
    /// Events for a zero-sized viewport (e.g. a minimised window) are ignored.
    pub fn handle_moved(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let normalised = Vec2::new(
            (x / f64::from(width)) as f32,
            1.0 - (y / f64::from(height)) as f32,
        );
        self.position = normalised.clamp(Vec2::ZERO, Vec2::ONE);
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

#[cfg(test)]
impl PointerState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position: position.clamp(Vec2::ZERO, Vec2::ONE),
        }
    }
}
