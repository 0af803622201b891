use eframe::egui::{Hyperlink, ScrollArea, Ui};
use std::time::Duration;

use crate::news::FeedView;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, spaced_separator};
use crate::utils::TimeUtils;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsPanelEvent {
    RefreshRequested,
    /// New desired state of the particle background
    ToggleBackground(bool),
}

/// Header, story list, error line and footer of the news feed
pub struct NewsPanel<'a> {
    view: &'a FeedView,
    fetching: bool,
    next_poll: Option<Duration>,
    source: String,
    /// `None` hides the toggle (background disabled on the command line)
    background_on: Option<bool>,
}

impl<'a> NewsPanel<'a> {
    pub fn new(
        view: &'a FeedView,
        fetching: bool,
        next_poll: Option<Duration>,
        source: String,
        background_on: Option<bool>,
    ) -> Self {
        Self {
            view,
            fetching,
            next_poll,
            source,
            background_on,
        }
    }

    fn render_items(&self, ui: &mut Ui) {
        if self.view.has_content() && self.view.entries().is_empty() {
            ui.label_subdued(UI_TEXT.empty_feed);
            return;
        }

        ScrollArea::vertical()
            .max_height((ui.available_height() - 80.0).max(60.0))
            .id_salt("news_items")
            .show(ui, |ui| {
                for entry in self.view.entries() {
                    let response = ui.add(
                        Hyperlink::from_label_and_url(entry.title.as_str(), &entry.link)
                            .open_in_new_tab(true),
                    );
                    if self.view.tooltips().is_bound(entry.id) && !entry.preview.is_empty() {
                        response.on_hover_text(entry.preview.as_str());
                    }
                    ui.add_space(2.0);
                }
            });
    }

    fn render_footer(&mut self, ui: &mut Ui) -> Vec<NewsPanelEvent> {
        let mut events = Vec::new();

        ui.horizontal(|ui| {
            if let Some(at) = self.view.updated_at() {
                ui.label_subdued(format!(
                    "{}{}",
                    UI_TEXT.updated_prefix,
                    TimeUtils::clock_string(at)
                ));
            }

            if self.fetching {
                ui.label_subdued(UI_TEXT.fetching);
            } else {
                match self.next_poll {
                    Some(wait) => ui.label_subdued(format!(
                        "{}{}",
                        UI_TEXT.next_poll_prefix,
                        TimeUtils::format_age(wait)
                    )),
                    None => ui.label_subdued(UI_TEXT.polling_stopped),
                }
            }
        });

        ui.horizontal(|ui| {
            if ui
                .button(UI_TEXT.refresh_button)
                .on_hover_text(UI_TEXT.refresh_tooltip)
                .clicked()
            {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("Manual refresh requested");
                }
                events.push(NewsPanelEvent::RefreshRequested);
            }

            if let Some(mut on) = self.background_on {
                if ui.checkbox(&mut on, UI_TEXT.background_toggle).changed() {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_ui_interactions {
                        log::info!("Background toggled: {}", on);
                    }
                    self.background_on = Some(on);
                    events.push(NewsPanelEvent::ToggleBackground(on));
                }
            }
        });

        ui.metric(
            UI_TEXT.source_label,
            &self.source,
            UI_CONFIG.colors.label,
        );

        events
    }
}

impl<'a> Panel for NewsPanel<'a> {
    type Event = NewsPanelEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        section_heading(ui, UI_TEXT.news_heading);
        ui.label_subheader(self.view.header());

        if let Some(message) = self.view.error_message() {
            ui.label_error(message);
        }
        spaced_separator(ui);

        self.render_items(ui);
        spaced_separator(ui);

        self.render_footer(ui)
    }
}
