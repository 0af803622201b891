#![allow(clippy::collapsible_if)]

// Core modules
pub mod background;
pub mod config;
pub mod news;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use background::{BackgroundHandle, create_particle_background};
pub use news::{FeedSnapshot, NewsPoller};
pub use ui::FeedGlowApp;
pub use utils::app_time;

use std::time::Duration;

// CLI argument parsing
use clap::Parser;

use crate::config::{FEED, PARTICLES};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// News endpoint to poll
    #[arg(long)]
    pub feed_url: Option<String>,

    /// Number of particles in the background cloud
    #[arg(long, default_value_t = PARTICLES.count)]
    pub particles: usize,

    /// Skip the animated background entirely
    #[arg(long, default_value_t = false)]
    pub no_background: bool,

    /// Seconds between scheduled polls
    #[arg(long, default_value_t = FEED.poll_interval.as_secs())]
    pub poll_secs: u64,
}

/// Runtime settings resolved from the command line (native) or the page (web).
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub feed_url: String,
    pub poll_interval: Duration,
    pub particle_count: usize,
    pub background: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            feed_url: FEED.default_url.to_string(),
            poll_interval: FEED.poll_interval,
            particle_count: PARTICLES.count,
            background: true,
        }
    }
}

impl AppSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            feed_url: cli
                .feed_url
                .clone()
                .unwrap_or_else(|| FEED.default_url.to_string()),
            // A zero interval would poll every frame
            poll_interval: Duration::from_secs(cli.poll_secs.max(1)),
            particle_count: cli.particles,
            background: !cli.no_background,
        }
    }

    /// Feed endpoint relative to the page origin.
    #[cfg(target_arch = "wasm32")]
    pub fn for_web() -> Self {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default();
        Self {
            feed_url: format!("{}{}", origin, FEED.web_path),
            ..Default::default()
        }
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext, settings: AppSettings) -> Box<dyn eframe::App> {
    Box::new(FeedGlowApp::new(cc, settings))
}
