//! Animated particle field painted behind the news overlay.
//!
//! `create_particle_background` is the only entry point. It never fails from
//! the caller's point of view: anything that prevents rendering is logged and
//! yields an inert handle, so the page keeps working without the effect.

pub mod camera;
pub mod container;
pub mod particles;
pub mod passes;
pub mod renderer;
pub mod scene;

use eframe::egui::{Id, Painter};
use std::fmt;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use crate::config::PARTICLES;
pub use container::{Container, ContainerEvent, ListenerKind, SurfaceId};
pub use scene::ParticleBackground;

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundError {
    InvalidContainer(String),
    RendererInit(String),
    SurfaceAlreadyAttached,
    SurfaceNotAttached,
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::InvalidContainer(msg) => write!(f, "Invalid container: {}", msg),
            BackgroundError::RendererInit(msg) => write!(f, "Renderer init failed: {}", msg),
            BackgroundError::SurfaceAlreadyAttached => {
                write!(f, "Container already hosts a surface")
            }
            BackgroundError::SurfaceNotAttached => write!(f, "Surface is not attached"),
        }
    }
}

impl std::error::Error for BackgroundError {}

#[derive(Debug, Clone, Copy)]
pub struct BackgroundSettings {
    pub particle_count: usize,
    /// Fixed seed for reproducible clouds; random when `None`
    pub seed: Option<u64>,
    pub surface: SurfaceId,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            particle_count: PARTICLES.count,
            seed: None,
            surface: SurfaceId(Id::new("particle_background")),
        }
    }
}

/// Owner's view of a background. Inert when creation failed.
#[derive(Default)]
pub struct BackgroundHandle {
    inner: Option<ParticleBackground>,
}

impl BackgroundHandle {
    pub fn noop() -> Self {
        Self { inner: None }
    }

    pub fn is_active(&self) -> bool {
        self.inner.as_ref().is_some_and(|bg| bg.is_active())
    }

    pub fn background(&self) -> Option<&ParticleBackground> {
        self.inner.as_ref()
    }

    pub fn frame(&mut self, container: &mut Container, painter: &Painter, dt: f32) {
        if let Some(bg) = self.inner.as_mut() {
            bg.frame(container, painter, dt);
        }
    }

    /// Stops the loop, unsubscribes, frees resources and detaches the surface.
    ///
    /// Returns `true` only for the call that actually tore something down.
    pub fn teardown(&mut self, container: &mut Container) -> bool {
        let Some(mut bg) = self.inner.take() else {
            return false;
        };

        bg.stop();
        container.remove_listener(ListenerKind::Resize);
        container.remove_listener(ListenerKind::Pointer);
        bg.release();

        if let Err(e) = container.detach_surface(bg.surface()) {
            log::warn!("Background teardown: {}", e);
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_background_lifecycle {
            log::info!("Particle background torn down");
        }

        true
    }
}

/// Creates the background inside `container`, or a no-op handle on failure.
pub fn create_particle_background(
    container: &mut Container,
    settings: BackgroundSettings,
    pixels_per_point: f32,
) -> BackgroundHandle {
    if !container.is_displayable() {
        let err = BackgroundError::InvalidContainer(format!("unusable rect {:?}", container.rect()));
        log::error!("Particle background disabled: {}", err);
        return BackgroundHandle::noop();
    }

    match ParticleBackground::new(container, &settings, &PARTICLES, pixels_per_point) {
        Ok(bg) => {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_background_lifecycle {
                log::info!(
                    "Particle background started: {} particles, {:.0}x{:.0}",
                    settings.particle_count,
                    container.size().x,
                    container.size().y
                );
            }
            BackgroundHandle { inner: Some(bg) }
        }
        Err(e) => {
            log::error!("Particle background disabled: {}", e);
            BackgroundHandle::noop()
        }
    }
}
