use egui::{Color32, Visuals, style::Widgets};

use crate::config::ThemeConfig;

/// Colors used by every screen. Built once from the config and passed down
/// to each render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub dark: Color32,
    pub light: Color32,
    pub primary: Color32,
    pub secondary: Color32,
    pub error: Color32,
}

impl Theme {
    pub fn visuals(&self) -> Visuals {
        Visuals {
            dark_mode: true,
            hyperlink_color: self.primary,
            faint_bg_color: self.dark,
            extreme_bg_color: self.dark,
            panel_fill: self.dark,
            window_fill: self.dark,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        }
    }
}

impl From<&ThemeConfig> for Theme {
    fn from(value: &ThemeConfig) -> Self {
        let rgb = |[r, g, b]: [u8; 3]| Color32::from_rgb(r, g, b);
        Self {
            dark: rgb(value.dark),
            light: rgb(value.light),
            primary: rgb(value.primary),
            secondary: rgb(value.secondary),
            error: rgb(value.error),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}
