use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    /// Behind the particles; black so additive sprites glow
    pub backdrop: Color32,
    /// Translucent card the news list sits on
    pub news_card: Color32,
    pub link: Color32,
    pub error: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub news_card_width: f32,
    pub news_card_margin: f32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::from_rgb(0x00, 0xf7, 0xff),
        subsection_heading: Color32::from_rgb(0xff, 0x77, 0x00),
        backdrop: Color32::BLACK,
        news_card: Color32::from_rgba_premultiplied(10, 10, 18, 200),
        link: Color32::from_rgb(220, 220, 235),
        error: Color32::from_rgb(255, 100, 100),
    },
    news_card_width: 420.0,
    news_card_margin: 24.0,
};
