use eframe::egui::{CentralPanel, Context, Frame, Margin, Rect, Ui};
use eframe::Frame as EframeFrame;
use std::time::Duration;

use crate::AppSettings;
use crate::background::{
    BackgroundHandle, BackgroundSettings, Container, create_particle_background,
};
use crate::news::{FreshnessPolicy, HttpFeedSource, NewsPoller};
use crate::ui::config::UI_CONFIG;
use crate::ui::ui_panels::{NewsPanel, NewsPanelEvent, Panel};
use crate::ui::utils::setup_custom_visuals;
use crate::utils::app_time::{AppInstant, now};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Repaint cadence while a fetch is outstanding and nothing else animates
const FETCH_REPAINT: Duration = Duration::from_millis(100);

/// Where the particle background stands for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundState {
    /// Turned off with `--no-background`; no toggle either
    Disabled,
    /// User switched it off
    Off,
    /// Wanted; created on the next frame with a usable container
    Pending,
    Running,
    /// Creation failed; stays off until the user toggles it again
    Failed,
}

pub struct FeedGlowApp {
    poller: NewsPoller,
    container: Option<Container>,
    background: BackgroundHandle,
    background_settings: BackgroundSettings,
    background_state: BackgroundState,
    last_frame: Option<AppInstant>,
}

impl FeedGlowApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        setup_custom_visuals(&cc.egui_ctx);

        let source = HttpFeedSource::new(settings.feed_url.clone());
        let poller = NewsPoller::new(
            Box::new(source),
            FreshnessPolicy::default(),
            settings.poll_interval,
        );

        Self {
            poller,
            container: None,
            background: BackgroundHandle::noop(),
            background_settings: BackgroundSettings {
                particle_count: settings.particle_count,
                ..Default::default()
            },
            background_state: if settings.background {
                BackgroundState::Pending
            } else {
                BackgroundState::Disabled
            },
            last_frame: None,
        }
    }

    fn frame_delta(&mut self, now: AppInstant) -> f32 {
        self.last_frame
            .replace(now)
            .map(|prev| now.duration_since(prev).as_secs_f32())
            .unwrap_or(0.0)
    }

    /// Keeps the container in sync with the panel and drives the background.
    fn paint_background(&mut self, ctx: &Context, ui: &Ui, rect: Rect, dt: f32) {
        let container = self.container.get_or_insert_with(|| Container::new(rect));
        container.set_rect(rect);
        container.pointer_moved(ctx.pointer_hover_pos());

        if self.background_state == BackgroundState::Pending && container.is_displayable() {
            self.background =
                create_particle_background(container, self.background_settings, ctx.pixels_per_point());
            self.background_state = if self.background.is_active() {
                BackgroundState::Running
            } else {
                BackgroundState::Failed
            };
        }

        if self.background_state == BackgroundState::Running {
            self.background.frame(container, ui.painter(), dt);
        }
    }

    fn teardown_background(&mut self) {
        if let Some(container) = self.container.as_mut() {
            self.background.teardown(container);
        }
    }

    fn render_news(&mut self, ui: &mut Ui) -> Vec<NewsPanelEvent> {
        let background_on = match self.background_state {
            BackgroundState::Disabled => None,
            BackgroundState::Off | BackgroundState::Failed => Some(false),
            BackgroundState::Pending | BackgroundState::Running => Some(true),
        };

        let mut panel = NewsPanel::new(
            self.poller.view(),
            self.poller.is_fetching(),
            self.poller.time_until_next_poll(now()),
            self.poller.source_description(),
            background_on,
        );

        Frame::new()
            .fill(UI_CONFIG.colors.news_card)
            .inner_margin(Margin::same(12))
            .corner_radius(8)
            .show(ui, |ui| {
                ui.set_max_width(UI_CONFIG.news_card_width);
                panel.render(ui)
            })
            .inner
    }

    fn handle_news_events(&mut self, events: Vec<NewsPanelEvent>) {
        for event in events {
            match event {
                NewsPanelEvent::RefreshRequested => {
                    self.poller.refresh_now(now());
                }
                NewsPanelEvent::ToggleBackground(true) => {
                    self.background_state = BackgroundState::Pending;
                }
                NewsPanelEvent::ToggleBackground(false) => {
                    self.teardown_background();
                    self.background_state = BackgroundState::Off;
                }
            }
        }
    }

    fn schedule_repaint(&self, ctx: &Context) {
        if self.background.is_active() {
            ctx.request_repaint();
        } else if self.poller.is_fetching() {
            ctx.request_repaint_after(FETCH_REPAINT);
        } else if let Some(wait) = self.poller.time_until_next_poll(now()) {
            // Footer countdown ticks in whole seconds
            ctx.request_repaint_after(wait.min(Duration::from_secs(1)));
        }
    }
}

impl eframe::App for FeedGlowApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.poller.stop();
        self.teardown_background();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn update(&mut self, ctx: &Context, _frame: &mut EframeFrame) {
        let now = now();
        self.poller.tick(now);
        let dt = self.frame_delta(now);

        let events = CentralPanel::default()
            .frame(Frame::new().fill(UI_CONFIG.colors.backdrop))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.paint_background(ctx, ui, rect, dt);

                ui.add_space(UI_CONFIG.news_card_margin);
                ui.horizontal_top(|ui| {
                    ui.add_space(UI_CONFIG.news_card_margin);
                    ui.vertical(|ui| self.render_news(ui)).inner
                })
                .inner
            })
            .inner;

        self.handle_news_events(events);
        self.schedule_repaint(ctx);
    }
}
