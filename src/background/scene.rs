use eframe::egui::{Painter, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use crate::background::camera::PerspectiveCamera;
use crate::background::container::{Container, ContainerEvent, ListenerKind, SurfaceId};
use crate::background::particles::{ParticleBuffers, StepStats};
use crate::background::passes::{Composer, FrameBuffer, FrameUniforms, PassInput};
use crate::background::renderer::Renderer;
use crate::background::{BackgroundError, BackgroundSettings};
use crate::config::ParticleConfig;
use crate::utils::maths_utils::rotate_y_vec;

/// Everything the render pass needs to know about the world.
#[derive(Debug, Clone)]
pub struct Scene {
    pub particles: ParticleBuffers,
    /// Rotation of the whole cloud about Y, radians
    pub rotation_y: f32,
    pub fog_density: f32,
}

impl Scene {
    pub fn new<R: Rng + ?Sized>(count: usize, config: &ParticleConfig, rng: &mut R) -> Self {
        Self {
            particles: ParticleBuffers::generate(count, config, rng),
            rotation_y: 0.0,
            fog_density: config.fog_density,
        }
    }

    /// Exponential-squared fog: 1 at the camera, falling toward 0 with depth.
    pub fn fog_factor(&self, depth: f32) -> f32 {
        let d = self.fog_density * depth;
        (-(d * d)).exp()
    }
}

/// A live particle background bound to one container.
pub struct ParticleBackground {
    config: &'static ParticleConfig,
    surface: SurfaceId,
    scene: Scene,
    camera: PerspectiveCamera,
    renderer: Renderer,
    composer: Composer,
    rng: StdRng,
    /// Animation clock in animation seconds
    time: f32,
    /// Last pointer position in NDC, `None` when outside the container
    pointer_ndc: Option<[f32; 2]>,
    uniforms: FrameUniforms,
    active: bool,
    last_stats: StepStats,
}

impl ParticleBackground {
    /// Builds the renderer first so a failure leaves the container untouched.
    pub fn new(
        container: &mut Container,
        settings: &BackgroundSettings,
        config: &'static ParticleConfig,
        pixels_per_point: f32,
    ) -> Result<Self, BackgroundError> {
        let surface = settings.surface;
        let size = container.size();
        let renderer = Renderer::new(surface, size, pixels_per_point, config.max_surface_side)?;

        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let scene = Scene::new(settings.particle_count, config, &mut rng);
        let camera = PerspectiveCamera::new(&config.camera, size.x / size.y);
        let composer = Composer::standard(size, config);

        container.attach_surface(surface)?;
        container.add_listener(ListenerKind::Resize);
        container.add_listener(ListenerKind::Pointer);

        Ok(Self {
            config,
            surface,
            scene,
            camera,
            renderer,
            composer,
            rng,
            time: 0.0,
            pointer_ndc: None,
            uniforms: FrameUniforms {
                time: 0.0,
                bloom_strength: config.bloom.strength,
            },
            active: true,
            last_stats: StepStats::default(),
        })
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn uniforms(&self) -> FrameUniforms {
        self.uniforms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    /// Applies queued resize and pointer events.
    pub fn handle_events(&mut self, container: &mut Container) {
        for event in container.drain_events() {
            match event {
                ContainerEvent::Resized(size) => self.resize(size),
                ContainerEvent::PointerMoved(local) => {
                    let viewport = self.composer.viewport();
                    self.pointer_ndc =
                        local.map(|pos| PerspectiveCamera::screen_to_ndc(pos, viewport));
                }
            }
        }
    }

    fn resize(&mut self, size: Vec2) {
        // A collapsed panel keeps the previous projection until it has area again
        if !(size.x > 0.0 && size.y > 0.0) {
            return;
        }

        self.camera.set_aspect(size.x / size.y);
        self.renderer.set_size(size);
        // Passes and pointer mapping work in container points, not surface pixels
        self.composer.set_size(size);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_background_lifecycle {
            log::info!("Background resized to {:.0}x{:.0}", size.x, size.y);
        }
    }

    /// One animation step. Returns `None` once the loop has been stopped.
    pub fn animate(&mut self, dt: f32) -> Option<FrameBuffer> {
        if !self.active {
            return None;
        }

        let config = self.config;
        let motion = &config.motion;
        let dt = dt.clamp(0.0, motion.max_frame_delta);
        self.time += dt * motion.time_scale;

        // Pointer lives in world space, particles in the rotated cloud's space
        let attractor = self.pointer_ndc.map(|ndc| {
            let world = self.camera.unproject_to_origin_plane(ndc);
            rotate_y_vec(world, -self.scene.rotation_y)
        });

        self.last_stats = self
            .scene
            .particles
            .step(dt, attractor, motion, &mut self.rng);
        self.scene.particles.pulse_sizes(self.time, motion.size_pulse);
        self.scene.rotation_y = self.time * motion.rotation_speed;

        let bloom = &config.bloom;
        self.uniforms = FrameUniforms {
            time: self.time,
            bloom_strength: bloom.strength
                + bloom.strength_wobble * (self.time * bloom.wobble_speed).sin(),
        };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_particle_stats {
            log::info!(
                "t={:.2} agitated={} rebounds={}",
                self.time,
                self.last_stats.agitated,
                self.last_stats.rebounds
            );
        }

        let input = PassInput {
            scene: &self.scene,
            camera: &self.camera,
            viewport: self.composer.viewport(),
            uniforms: self.uniforms,
        };
        Some(self.composer.render(&input, &mut self.rng))
    }

    /// Events, animation and painting for one host frame.
    pub fn frame(&mut self, container: &mut Container, painter: &Painter, dt: f32) {
        self.handle_events(container);
        self.renderer.set_pixels_per_point(painter.pixels_per_point());
        if let Some(frame) = self.animate(dt) {
            self.renderer.present(painter, container.rect().min, &frame);
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Drops the pass chain and releases the surface resources.
    pub fn release(&mut self) {
        self.composer.clear();
        self.renderer.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARTICLES;
    use crate::utils::maths_utils::length;
    use eframe::egui::{Id, Rect, pos2, vec2};

    fn settings(count: usize) -> BackgroundSettings {
        BackgroundSettings {
            particle_count: count,
            seed: Some(11),
            surface: SurfaceId(Id::new("scene_test")),
        }
    }

    fn container() -> Container {
        Container::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0)))
    }

    #[test]
    fn fog_fades_with_depth() {
        let mut rng = StdRng::seed_from_u64(0);
        let scene = Scene::new(1, &PARTICLES, &mut rng);
        assert!((scene.fog_factor(0.0) - 1.0).abs() < f32::EPSILON);
        assert!(scene.fog_factor(20.0) > scene.fog_factor(35.0));
        assert!(scene.fog_factor(35.0) > 0.0);
    }

    #[test]
    fn creation_attaches_surface_and_listeners() {
        let mut c = container();
        let bg = ParticleBackground::new(&mut c, &settings(100), &PARTICLES, 1.0).unwrap();
        assert_eq!(c.surface(), Some(bg.surface()));
        assert!(c.has_listener(ListenerKind::Resize));
        assert!(c.has_listener(ListenerKind::Pointer));
        assert_eq!(bg.scene().particles.len(), 100);
    }

    #[test]
    fn renderer_failure_leaves_container_untouched() {
        let mut c = container();
        let result = ParticleBackground::new(&mut c, &settings(100), &PARTICLES, f32::NAN);
        assert!(matches!(result, Err(BackgroundError::RendererInit(_))));
        assert_eq!(c.surface(), None);
        assert!(!c.has_listener(ListenerKind::Resize));
    }

    #[test]
    fn resize_updates_camera_and_viewport() {
        let mut c = container();
        let mut bg = ParticleBackground::new(&mut c, &settings(10), &PARTICLES, 1.0).unwrap();

        c.set_rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 500.0)));
        bg.handle_events(&mut c);

        assert!((bg.camera().aspect() - 2.0).abs() < 1e-6);
        assert_eq!(bg.renderer().size(), vec2(1000.0, 500.0));
    }

    #[test]
    fn oversized_resize_keeps_pointer_mapping_in_container_points() {
        let mut c = container();
        let mut bg = ParticleBackground::new(&mut c, &settings(10), &PARTICLES, 1.0).unwrap();

        c.set_rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(20_000.0, 600.0)));
        c.pointer_moved(Some(pos2(10_000.0, 300.0)));
        bg.handle_events(&mut c);

        // Surface is clamped, the pass viewport is not
        assert_eq!(bg.renderer().size(), vec2(PARTICLES.max_surface_side, 600.0));
        assert_eq!(bg.composer.viewport(), vec2(20_000.0, 600.0));

        let [x, y] = bg.pointer_ndc.unwrap();
        assert!(x.abs() < 1e-5 && y.abs() < 1e-5, "pointer at center, got {x},{y}");
    }

    #[test]
    fn pointer_already_inside_is_known_after_creation() {
        let mut c = container();
        // Host reports the pointer before the background exists
        c.pointer_moved(Some(pos2(400.0, 300.0)));

        let mut bg = ParticleBackground::new(&mut c, &settings(10), &PARTICLES, 1.0).unwrap();
        // Next frame: the pointer has not moved
        c.pointer_moved(Some(pos2(400.0, 300.0)));
        bg.handle_events(&mut c);

        assert!(bg.pointer_ndc.is_some());
    }

    #[test]
    fn animation_keeps_particles_inside_the_sphere() {
        let mut c = container();
        let mut bg = ParticleBackground::new(&mut c, &settings(2_000), &PARTICLES, 1.0).unwrap();
        c.pointer_moved(Some(pos2(400.0, 300.0)));
        bg.handle_events(&mut c);

        for _ in 0..120 {
            assert!(bg.animate(1.0 / 60.0).is_some());
        }
        for p in bg.scene().particles.positions() {
            assert!(length(*p) <= PARTICLES.sphere_radius + 1e-4);
        }
        assert!(bg.time() > 0.0);
        assert!((bg.scene().rotation_y - bg.time() * PARTICLES.motion.rotation_speed).abs() < 1e-6);
    }

    #[test]
    fn huge_frame_delta_is_clamped() {
        let mut c = container();
        let mut bg = ParticleBackground::new(&mut c, &settings(10), &PARTICLES, 1.0).unwrap();
        bg.animate(30.0);
        let expected = PARTICLES.motion.max_frame_delta * PARTICLES.motion.time_scale;
        assert!((bg.time() - expected).abs() < 1e-6);
    }

    #[test]
    fn bloom_strength_wobbles_around_base() {
        let mut c = container();
        let mut bg = ParticleBackground::new(&mut c, &settings(10), &PARTICLES, 1.0).unwrap();
        for _ in 0..50 {
            bg.animate(0.1);
            let strength = bg.uniforms().bloom_strength;
            assert!(strength >= PARTICLES.bloom.strength - PARTICLES.bloom.strength_wobble - 1e-4);
            assert!(strength <= PARTICLES.bloom.strength + PARTICLES.bloom.strength_wobble + 1e-4);
        }
    }

    #[test]
    fn stopped_background_produces_no_frames() {
        let mut c = container();
        let mut bg = ParticleBackground::new(&mut c, &settings(10), &PARTICLES, 1.0).unwrap();
        bg.stop();
        assert!(bg.animate(0.016).is_none());
        assert!(!bg.is_active());
    }
}
