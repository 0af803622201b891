//! Post-processing chain for the particle background.
//!
//! A frame is a flat list of additive sprites in container-local points. The
//! render pass produces the sprites from the scene; every later pass rewrites
//! or extends that list. The renderer finally hands it to the egui painter.

use eframe::egui::{Pos2, Rgba, Vec2, pos2};
use rand::Rng;
use rand::rngs::StdRng;
use strum_macros::{Display, EnumIter};

use crate::background::camera::PerspectiveCamera;
use crate::background::scene::Scene;
use crate::config::ParticleConfig;
use crate::utils::maths_utils::rotate_y_vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum PassKind {
    Render,
    Bloom,
    ChromaticShift,
    FilmGrain,
}

/// Which pass produced a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLayer {
    Core,
    Halo,
    Grain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub center: Pos2,
    pub radius: f32,
    /// Linear, premultiplied; painted additively
    pub color: Rgba,
    pub layer: SpriteLayer,
}

#[derive(Debug, Default, Clone)]
pub struct FrameBuffer {
    pub sprites: Vec<Sprite>,
}

/// Per-frame values the passes read. The equivalent of shader uniforms.
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
    pub time: f32,
    pub bloom_strength: f32,
}

pub struct PassInput<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    pub viewport: Vec2,
    pub uniforms: FrameUniforms,
}

pub trait PostPass {
    fn kind(&self) -> PassKind;

    fn set_size(&mut self, _viewport: Vec2) {}

    fn apply(&mut self, frame: &mut FrameBuffer, input: &PassInput<'_>, rng: &mut StdRng);
}

fn luminance(color: Rgba) -> f32 {
    0.2126 * color.r() + 0.7152 * color.g() + 0.0722 * color.b()
}

/// Projects the point cloud into sprites.
pub struct RenderPass {
    size_to_pixels: f32,
    opacity: f32,
}

impl PostPass for RenderPass {
    fn kind(&self) -> PassKind {
        PassKind::Render
    }

    fn apply(&mut self, frame: &mut FrameBuffer, input: &PassInput<'_>, _rng: &mut StdRng) {
        let scene = input.scene;
        let particles = &scene.particles;
        frame.sprites.clear();
        frame.sprites.reserve(particles.len());

        for i in 0..particles.len() {
            let world = rotate_y_vec(particles.positions()[i], scene.rotation_y);
            let Some(projected) = input.camera.project(world, input.viewport) else {
                continue;
            };

            let fog = scene.fog_factor(projected.depth);
            let alpha = self.opacity * fog;
            if alpha <= f32::EPSILON {
                continue;
            }

            // Size attenuation: farther is smaller
            let radius = (particles.sizes()[i] * self.size_to_pixels / projected.depth).max(0.5);
            let c = particles.colors()[i];
            frame.sprites.push(Sprite {
                center: projected.screen,
                radius,
                color: Rgba::from_rgb(c[0] * alpha, c[1] * alpha, c[2] * alpha).additive(),
                layer: SpriteLayer::Core,
            });
        }
    }
}

/// Adds a soft halo behind every sprite bright enough to pass the threshold.
pub struct BloomPass {
    threshold: f32,
    radius: f32,
}

impl PostPass for BloomPass {
    fn kind(&self) -> PassKind {
        PassKind::Bloom
    }

    fn apply(&mut self, frame: &mut FrameBuffer, input: &PassInput<'_>, _rng: &mut StdRng) {
        let strength = input.uniforms.bloom_strength.max(0.0);
        if strength <= 0.0 {
            return;
        }

        // Halo energy is spread over a larger disc, hence the small gain
        let gain = strength * 0.12;
        let spread = 1.0 + 2.0 * self.radius;

        let halos: Vec<Sprite> = frame
            .sprites
            .iter()
            .filter(|sprite| luminance(sprite.color) >= self.threshold)
            .map(|sprite| Sprite {
                center: sprite.center,
                radius: sprite.radius * spread,
                color: sprite.color * gain,
                layer: SpriteLayer::Halo,
            })
            .collect();

        // Halos go underneath the cores
        let mut sprites = halos;
        sprites.append(&mut frame.sprites);
        frame.sprites = sprites;
    }
}

/// Splits each bloom halo into red and blue fringes offset horizontally.
///
/// Cores stay whole: at these offsets the fringe only shows on the wide halos,
/// and splitting cores would triple the painted sprite count.
pub struct ChromaticShiftPass {
    amount: f32,
    offset: f32,
}

impl PostPass for ChromaticShiftPass {
    fn kind(&self) -> PassKind {
        PassKind::ChromaticShift
    }

    fn set_size(&mut self, viewport: Vec2) {
        self.offset = self.amount * viewport.x;
    }

    fn apply(&mut self, frame: &mut FrameBuffer, _input: &PassInput<'_>, _rng: &mut StdRng) {
        if self.offset < 0.25 {
            return;
        }

        let halos = frame
            .sprites
            .iter()
            .filter(|sprite| sprite.layer == SpriteLayer::Halo)
            .count();
        if halos == 0 {
            return;
        }

        let mut shifted = Vec::with_capacity(frame.sprites.len() + halos * 2);
        for sprite in &frame.sprites {
            if sprite.layer != SpriteLayer::Halo {
                shifted.push(*sprite);
                continue;
            }
            let c = sprite.color;
            shifted.push(Sprite {
                center: pos2(sprite.center.x + self.offset, sprite.center.y),
                color: Rgba::from_rgba_premultiplied(c.r(), 0.0, 0.0, 0.0),
                ..*sprite
            });
            shifted.push(Sprite {
                color: Rgba::from_rgba_premultiplied(0.0, c.g(), 0.0, 0.0),
                ..*sprite
            });
            shifted.push(Sprite {
                center: pos2(sprite.center.x - self.offset, sprite.center.y),
                color: Rgba::from_rgba_premultiplied(0.0, 0.0, c.b(), 0.0),
                ..*sprite
            });
        }
        frame.sprites = shifted;
    }
}

/// Sprinkles faint random specks over the whole viewport, new every frame.
pub struct FilmGrainPass {
    intensity: f32,
    density: f32,
    specks: usize,
}

impl PostPass for FilmGrainPass {
    fn kind(&self) -> PassKind {
        PassKind::FilmGrain
    }

    fn set_size(&mut self, viewport: Vec2) {
        let area = (viewport.x * viewport.y).max(0.0);
        self.specks = (area / 10_000.0 * self.density) as usize;
    }

    fn apply(&mut self, frame: &mut FrameBuffer, input: &PassInput<'_>, rng: &mut StdRng) {
        if self.intensity <= 0.0 {
            return;
        }

        frame.sprites.reserve(self.specks);
        for _ in 0..self.specks {
            let level = self.intensity * rng.r#gen::<f32>() * 0.25;
            frame.sprites.push(Sprite {
                center: pos2(
                    rng.r#gen::<f32>() * input.viewport.x,
                    rng.r#gen::<f32>() * input.viewport.y,
                ),
                radius: 0.5 + rng.r#gen::<f32>() * 0.5,
                color: Rgba::from_rgb(level, level, level).additive(),
                layer: SpriteLayer::Grain,
            });
        }
    }
}

/// Runs the passes in insertion order.
pub struct Composer {
    passes: Vec<Box<dyn PostPass>>,
    viewport: Vec2,
}

impl Composer {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            passes: Vec::new(),
            viewport,
        }
    }

    /// Render → bloom → chromatic shift → film grain.
    pub fn standard(viewport: Vec2, config: &ParticleConfig) -> Self {
        let mut composer = Self::new(viewport);
        composer.add_pass(Box::new(RenderPass {
            size_to_pixels: config.size_to_pixels,
            opacity: config.opacity,
        }));
        composer.add_pass(Box::new(BloomPass {
            threshold: config.bloom.threshold,
            radius: config.bloom.radius,
        }));
        composer.add_pass(Box::new(ChromaticShiftPass {
            amount: config.rgb_shift_amount,
            offset: 0.0,
        }));
        composer.add_pass(Box::new(FilmGrainPass {
            intensity: config.grain_intensity,
            density: config.grain_density,
            specks: 0,
        }));
        composer
    }

    pub fn add_pass(&mut self, mut pass: Box<dyn PostPass>) {
        pass.set_size(self.viewport);
        self.passes.push(pass);
    }

    pub fn set_size(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        for pass in &mut self.passes {
            pass.set_size(viewport);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn pass_kinds(&self) -> Vec<PassKind> {
        self.passes.iter().map(|pass| pass.kind()).collect()
    }

    pub fn render(&mut self, input: &PassInput<'_>, rng: &mut StdRng) -> FrameBuffer {
        let mut frame = FrameBuffer::default();
        for pass in &mut self.passes {
            pass.apply(&mut frame, input, rng);
        }
        frame
    }

    pub fn clear(&mut self) {
        self.passes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARTICLES;
    use eframe::egui::{pos2, vec2};
    use rand::SeedableRng;
    use strum::IntoEnumIterator;

    fn sprite(x: f32, brightness: f32) -> Sprite {
        Sprite {
            center: pos2(x, 10.0),
            radius: 2.0,
            color: Rgba::from_rgb(brightness, brightness, brightness).additive(),
            layer: SpriteLayer::Core,
        }
    }

    fn halo(x: f32, brightness: f32) -> Sprite {
        Sprite {
            layer: SpriteLayer::Halo,
            ..sprite(x, brightness)
        }
    }

    fn with_input<T>(f: impl FnOnce(&PassInput<'_>) -> T) -> T {
        let mut rng = StdRng::seed_from_u64(1);
        let scene = Scene::new(10, &PARTICLES, &mut rng);
        let camera = PerspectiveCamera::new(&PARTICLES.camera, 1.0);
        let input = PassInput {
            scene: &scene,
            camera: &camera,
            viewport: vec2(1000.0, 1000.0),
            uniforms: FrameUniforms {
                time: 0.0,
                bloom_strength: PARTICLES.bloom.strength,
            },
        };
        f(&input)
    }

    #[test]
    fn standard_chain_runs_in_fixed_order() {
        let composer = Composer::standard(vec2(800.0, 600.0), &PARTICLES);
        let expected: Vec<PassKind> = PassKind::iter().collect();
        assert_eq!(composer.pass_kinds(), expected);
        assert_eq!(
            expected,
            vec![
                PassKind::Render,
                PassKind::Bloom,
                PassKind::ChromaticShift,
                PassKind::FilmGrain
            ]
        );
    }

    #[test]
    fn bloom_only_halos_bright_sprites() {
        let mut bloom = BloomPass {
            threshold: 0.5,
            radius: 0.8,
        };
        let mut frame = FrameBuffer {
            sprites: vec![sprite(1.0, 0.9), sprite(2.0, 0.1)],
        };
        let mut rng = StdRng::seed_from_u64(2);

        with_input(|input| bloom.apply(&mut frame, input, &mut rng));

        assert_eq!(frame.sprites.len(), 3);
        let halo = frame.sprites[0];
        assert_eq!(halo.center, pos2(1.0, 10.0));
        assert_eq!(halo.layer, SpriteLayer::Halo);
        assert!(halo.radius > 2.0);
        // Cores keep their original order after the halo
        assert_eq!(frame.sprites[1], sprite(1.0, 0.9));
    }

    #[test]
    fn chromatic_shift_splits_halo_channels() {
        let mut pass = ChromaticShiftPass {
            amount: 0.0025,
            offset: 0.0,
        };
        pass.set_size(vec2(1000.0, 1000.0));
        let mut frame = FrameBuffer {
            sprites: vec![halo(100.0, 0.6)],
        };
        let mut rng = StdRng::seed_from_u64(3);

        with_input(|input| pass.apply(&mut frame, input, &mut rng));

        let xs: Vec<f32> = frame.sprites.iter().map(|s| s.center.x).collect();
        assert_eq!(xs, vec![102.5, 100.0, 97.5]);
        assert_eq!(frame.sprites[0].color.g(), 0.0);
        assert_eq!(frame.sprites[2].color.r(), 0.0);
    }

    #[test]
    fn chromatic_shift_leaves_cores_whole() {
        let mut pass = ChromaticShiftPass {
            amount: 0.0025,
            offset: 0.0,
        };
        pass.set_size(vec2(1000.0, 1000.0));
        let mut frame = FrameBuffer {
            sprites: vec![halo(100.0, 0.6), sprite(100.0, 0.6), sprite(300.0, 0.2)],
        };
        let mut rng = StdRng::seed_from_u64(3);

        with_input(|input| pass.apply(&mut frame, input, &mut rng));

        assert_eq!(frame.sprites.len(), 5);
        assert_eq!(&frame.sprites[3..], &[sprite(100.0, 0.6), sprite(300.0, 0.2)]);
    }

    #[test]
    fn grain_scales_with_viewport_area() {
        let mut grain = FilmGrainPass {
            intensity: 0.35,
            density: 2.0,
            specks: 0,
        };
        grain.set_size(vec2(1000.0, 1000.0));
        let mut frame = FrameBuffer::default();
        let mut rng = StdRng::seed_from_u64(4);

        with_input(|input| grain.apply(&mut frame, input, &mut rng));

        assert_eq!(frame.sprites.len(), 200);
        assert!(frame.sprites.iter().all(|s| s.center.x >= 0.0 && s.center.x <= 1000.0));
    }

    #[test]
    fn full_chain_produces_sprites_for_visible_particles() {
        let mut composer = Composer::standard(vec2(1000.0, 1000.0), &PARTICLES);
        let mut rng = StdRng::seed_from_u64(5);
        let frame = with_input(|input| composer.render(input, &mut rng));
        assert!(!frame.sprites.is_empty());

        let count = |layer| frame.sprites.iter().filter(|s| s.layer == layer).count();
        let cores = count(SpriteLayer::Core);
        let halos = count(SpriteLayer::Halo);
        let grain = count(SpriteLayer::Grain);
        assert!(cores <= 10);
        // Each halo becomes three fringes, never more than one halo per core
        assert_eq!(halos % 3, 0);
        assert!(halos <= cores * 3);
        assert_eq!(cores + halos + grain, frame.sprites.len());
    }
}
