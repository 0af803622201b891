//! Particle background tuning.
//!
//! All lengths are world units; the camera sits on the +Z axis looking at the
//! origin where the sphere is centered.

/// Perspective camera defaults
pub struct CameraConfig {
    /// Vertical field of view, degrees
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the camera from the origin along +Z
    pub distance: f32,
}

/// Bloom pass parameters
pub struct BloomConfig {
    /// Minimum luminance (0..1) for a particle to bloom
    pub threshold: f32,
    pub strength: f32,
    /// Halo radius as a multiple of the particle radius, minus one
    pub radius: f32,
    /// Amplitude of the slow strength oscillation
    pub strength_wobble: f32,
    /// Angular speed of the strength oscillation (rad per animation second)
    pub wobble_speed: f32,
}

/// Motion rules for the point cloud
pub struct MotionConfig {
    /// Initial velocity components are drawn from [-initial_speed, initial_speed]
    pub initial_speed: f32,
    /// Velocity components never exceed this magnitude after agitation
    pub max_speed: f32,
    /// Particles closer than this to the pointer point get agitated
    pub pointer_radius: f32,
    /// Random velocity kick applied per axis to agitated particles
    pub agitation: f32,
    /// Fraction of velocity kept (and reversed) on rebound
    pub rebound_damping: f32,
    /// Radians per animation second for the whole cloud about Y
    pub rotation_speed: f32,
    /// Animation seconds advance this much per wall second
    pub time_scale: f32,
    /// Frame delta clamp so a stalled tab does not teleport particles
    pub max_frame_delta: f32,
    /// Relative amplitude of the size pulse
    pub size_pulse: f32,
}

/// The Master Particle Configuration
pub struct ParticleConfig {
    pub count: usize,
    pub sphere_radius: f32,
    pub palette: [[u8; 3]; 5],
    pub min_size: f32,
    pub size_spread: f32,
    pub min_speed_factor: f32,
    pub speed_factor_spread: f32,
    /// Pixels per world unit of particle size at unit depth
    pub size_to_pixels: f32,
    pub opacity: f32,
    /// Exponential-squared fog density
    pub fog_density: f32,
    pub camera: CameraConfig,
    pub bloom: BloomConfig,
    /// Chromatic shift as a fraction of viewport width
    pub rgb_shift_amount: f32,
    /// Film grain intensity (0..1)
    pub grain_intensity: f32,
    /// Grain specks per 10k square points of viewport
    pub grain_density: f32,
    /// Largest surface side the renderer accepts, in physical pixels
    pub max_surface_side: f32,
    pub motion: MotionConfig,
}

pub const PARTICLES: ParticleConfig = ParticleConfig {
    count: 15_000,
    sphere_radius: 15.0,
    palette: [
        [0x00, 0xf7, 0xff], // Neon blue
        [0xff, 0x00, 0xf7], // Neon pink
        [0x8a, 0x2b, 0xe2], // Blue violet
        [0x00, 0xff, 0x88], // Electric green
        [0xff, 0x77, 0x00], // Orange
    ],
    min_size: 0.02,
    size_spread: 0.08,
    min_speed_factor: 0.2,
    speed_factor_spread: 0.8,
    size_to_pixels: 400.0,
    opacity: 0.9,
    fog_density: 0.015,
    camera: CameraConfig {
        fov_y_deg: 75.0,
        near: 0.1,
        far: 1000.0,
        distance: 20.0,
    },
    bloom: BloomConfig {
        threshold: 0.1,
        strength: 1.8,
        radius: 0.8,
        strength_wobble: 0.3,
        wobble_speed: 0.5,
    },
    rgb_shift_amount: 0.0025,
    grain_intensity: 0.35,
    grain_density: 2.0,
    // Matches the common WebGL MAX_TEXTURE_SIZE
    max_surface_side: 16_384.0,
    motion: MotionConfig {
        initial_speed: 0.6,
        max_speed: 3.0,
        pointer_radius: 3.0,
        agitation: 0.4,
        rebound_damping: 0.8,
        rotation_speed: 0.05,
        time_scale: 0.5,
        max_frame_delta: 0.1,
        size_pulse: 0.2,
    },
};
