use eframe::egui::{Pos2, Vec2, pos2};

use crate::config::particles::CameraConfig;
use crate::utils::maths_utils::{Mat4, Vec3, mul, perspective, transform_point, translate};

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    distance: f32,
    view_projection: Mat4,
}

/// A point that survived projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Position in container-local points
    pub screen: Pos2,
    /// Distance in front of the camera (world units)
    pub depth: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            fov_y: config.fov_y_deg.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            distance: config.distance,
            view_projection: [0.0; 16],
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    fn update_projection_matrix(&mut self) {
        let projection = perspective(self.fov_y, self.aspect, self.near, self.far);
        let view = translate(0.0, 0.0, -self.distance);
        self.view_projection = mul(&projection, &view);
    }

    /// World point to screen, or `None` if it falls outside the frustum.
    pub fn project(&self, world: Vec3, viewport: Vec2) -> Option<Projected> {
        let clip = transform_point(&self.view_projection, world);
        let w = clip[3];
        if w < self.near || w > self.far {
            return None;
        }

        let ndc_x = clip[0] / w;
        let ndc_y = clip[1] / w;
        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        Some(Projected {
            screen: pos2(
                (ndc_x + 1.0) * 0.5 * viewport.x,
                (1.0 - ndc_y) * 0.5 * viewport.y,
            ),
            depth: w,
        })
    }

    /// Container-local point to normalized device coordinates.
    pub fn screen_to_ndc(local: Pos2, viewport: Vec2) -> [f32; 2] {
        [
            local.x / viewport.x * 2.0 - 1.0,
            1.0 - local.y / viewport.y * 2.0,
        ]
    }

    /// Where the ray through `ndc` crosses the z = 0 plane.
    pub fn unproject_to_origin_plane(&self, ndc: [f32; 2]) -> Vec3 {
        let half_height = (self.fov_y * 0.5).tan() * self.distance;
        [
            ndc[0] * half_height * self.aspect,
            ndc[1] * half_height,
            0.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARTICLES;
    use eframe::egui::vec2;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&PARTICLES.camera, 800.0 / 600.0)
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let p = camera().project([0.0, 0.0, 0.0], vec2(800.0, 600.0)).unwrap();
        assert!((p.screen.x - 400.0).abs() < 1e-3);
        assert!((p.screen.y - 300.0).abs() < 1e-3);
        assert!((p.depth - 20.0).abs() < 1e-4);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        assert!(camera().project([0.0, 0.0, 25.0], vec2(800.0, 600.0)).is_none());
    }

    #[test]
    fn unproject_then_project_round_trips() {
        let cam = camera();
        let viewport = vec2(800.0, 600.0);
        let local = pos2(200.0, 450.0);

        let world = cam.unproject_to_origin_plane(PerspectiveCamera::screen_to_ndc(local, viewport));
        let back = cam.project(world, viewport).unwrap();
        assert!((back.screen.x - local.x).abs() < 1e-2);
        assert!((back.screen.y - local.y).abs() < 1e-2);
    }

    #[test]
    fn wider_aspect_spreads_points_less_horizontally() {
        let mut cam = camera();
        let viewport = vec2(800.0, 600.0);
        let before = cam.project([5.0, 0.0, 0.0], viewport).unwrap().screen.x;

        cam.set_aspect(2.0);
        let after = cam.project([5.0, 0.0, 0.0], viewport).unwrap().screen.x;
        assert!((cam.aspect() - 2.0).abs() < f32::EPSILON);
        assert!(after < before);
    }
}
