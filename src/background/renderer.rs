use eframe::egui::{Color32, Painter, Pos2, Vec2};

use crate::background::BackgroundError;
use crate::background::container::SurfaceId;
use crate::background::passes::FrameBuffer;

/// Owns the drawing surface and turns a finished frame into painter shapes.
#[derive(Debug)]
pub struct Renderer {
    surface: SurfaceId,
    /// Size last asked for, in points
    requested_size: Vec2,
    /// `requested_size` clamped to the surface limit
    size: Vec2,
    pixels_per_point: f32,
    max_surface_side: f32,
    released: bool,
}

impl Renderer {
    pub fn new(
        surface: SurfaceId,
        size: Vec2,
        pixels_per_point: f32,
        max_surface_side: f32,
    ) -> Result<Self, BackgroundError> {
        if !pixels_per_point.is_finite() || pixels_per_point <= 0.0 {
            return Err(BackgroundError::RendererInit(format!(
                "unusable pixel ratio {}",
                pixels_per_point
            )));
        }

        let renderer = Self {
            surface,
            requested_size: size,
            size: Vec2::ZERO,
            pixels_per_point,
            max_surface_side,
            released: false,
        };
        renderer.check_size(size)?;

        Ok(Self { size, ..renderer })
    }

    fn check_size(&self, size: Vec2) -> Result<(), BackgroundError> {
        let physical = size * self.pixels_per_point;
        if physical.x > self.max_surface_side || physical.y > self.max_surface_side {
            return Err(BackgroundError::RendererInit(format!(
                "surface {}x{} px exceeds the {} px limit",
                physical.x, physical.y, self.max_surface_side
            )));
        }
        Ok(())
    }

    /// Oversized requests are clamped rather than failing mid-session.
    pub fn set_size(&mut self, size: Vec2) {
        self.requested_size = size;
        let limit = self.max_surface_side / self.pixels_per_point;
        self.size = Vec2::new(size.x.min(limit), size.y.min(limit));
    }

    /// The window moved to a display with another scale factor.
    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        if !pixels_per_point.is_finite()
            || pixels_per_point <= 0.0
            || pixels_per_point == self.pixels_per_point
        {
            return;
        }
        self.pixels_per_point = pixels_per_point;
        self.set_size(self.requested_size);
    }

    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Paints `frame` with `origin` as the container's top-left corner.
    pub fn present(&self, painter: &Painter, origin: Pos2, frame: &FrameBuffer) {
        if self.released {
            return;
        }

        for sprite in &frame.sprites {
            painter.circle_filled(
                origin + sprite.center.to_vec2(),
                sprite.radius,
                Color32::from(sprite.color),
            );
        }
    }

    pub fn release(&mut self) {
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Id, vec2};

    fn surface() -> SurfaceId {
        SurfaceId(Id::new("test_surface"))
    }

    #[test]
    fn rejects_bad_pixel_ratio() {
        for ppp in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Renderer::new(surface(), vec2(800.0, 600.0), ppp, 16_384.0),
                Err(BackgroundError::RendererInit(_))
            ));
        }
    }

    #[test]
    fn rejects_oversized_surface() {
        let result = Renderer::new(surface(), vec2(9_000.0, 600.0), 2.0, 16_384.0);
        assert!(matches!(result, Err(BackgroundError::RendererInit(_))));
    }

    #[test]
    fn resize_clamps_to_limit() {
        let mut renderer = Renderer::new(surface(), vec2(800.0, 600.0), 2.0, 16_384.0).unwrap();
        renderer.set_size(vec2(10_000.0, 700.0));
        assert_eq!(renderer.size(), vec2(8_192.0, 700.0));
    }

    #[test]
    fn scale_factor_change_reclamps_requested_size() {
        let mut renderer = Renderer::new(surface(), vec2(800.0, 600.0), 1.0, 16_384.0).unwrap();
        renderer.set_size(vec2(10_000.0, 700.0));
        assert_eq!(renderer.size(), vec2(10_000.0, 700.0));

        renderer.set_pixels_per_point(2.0);
        assert_eq!(renderer.pixels_per_point(), 2.0);
        assert_eq!(renderer.size(), vec2(8_192.0, 700.0));

        // Back on the low-DPI display the full request fits again
        renderer.set_pixels_per_point(1.0);
        assert_eq!(renderer.size(), vec2(10_000.0, 700.0));

        renderer.set_pixels_per_point(f32::NAN);
        assert_eq!(renderer.pixels_per_point(), 1.0);
    }
}
