use egui::{RichText, Spinner, Ui};
use log::{debug, info};

use crate::config::AppConfig;
use crate::loader::LoaderContext;
use crate::navigation::{Route, SplitMapParams};

pub mod map_view;
pub mod post_split;
pub mod split_map;
pub mod theme;

use post_split::PostSplitScreen;
use split_map::SplitMapScreen;
use theme::Theme;

const TITLE_TEXT_SIZE: f32 = 18.;
const SPINNER_SIZE: f32 = 36.;

/// Which view a screen drew in the last frame. `Loading` and `Error` come
/// from either screen, `Map` only from the split map screen and `Summary`
/// only from the post-split screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderedView {
    Loading,
    Error,
    Map,
    Summary,
}

pub(crate) fn loading_view(ui: &mut Ui, theme: &Theme) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.);
        ui.label(
            RichText::new("Loading...")
                .color(theme.light)
                .size(TITLE_TEXT_SIZE),
        );
        ui.add(Spinner::new().size(SPINNER_SIZE).color(theme.secondary));
    });
}

pub(crate) fn error_view(ui: &mut Ui, theme: &Theme, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.);
        ui.label(
            RichText::new("Error!")
                .color(theme.light)
                .size(TITLE_TEXT_SIZE),
        );
        ui.label(
            RichText::new(message)
                .color(theme.error)
                .size(TITLE_TEXT_SIZE),
        );
    });
}

pub enum Screen {
    SplitMap(SplitMapScreen),
    PostSplit(PostSplitScreen),
}

/// `GpxSplitApp` hosts the split flow: a stack of screens where the top one
/// is drawn each frame.
///
/// Screens queue navigation requests while drawing; the app applies them
/// once the frame is done so a screen is never replaced mid-draw.
pub struct GpxSplitApp {
    screens: Vec<Screen>,
    loader_context: LoaderContext,
    theme: Theme,
    config: AppConfig,
}

impl GpxSplitApp {
    pub fn new(params: SplitMapParams, loader_context: LoaderContext, config: AppConfig) -> Self {
        let theme = Theme::from(&config.theme);
        let first_screen = SplitMapScreen::new(params, loader_context.loader());
        Self {
            screens: vec![Screen::SplitMap(first_screen)],
            loader_context,
            theme,
            config,
        }
    }

    pub fn with_creation_context(self, cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(self.theme.visuals());
        self
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    /// Apply a navigation request. Returns `false` when the request asks to
    /// leave the first screen.
    pub fn navigate(&mut self, route: Route) -> bool {
        match route {
            Route::SplitMap(params) => {
                if let Some(Screen::SplitMap(screen)) = self.screens.last_mut() {
                    screen.set_params(params);
                } else {
                    info!("Opening split map for {}", params.file_reference);
                    let screen = SplitMapScreen::new(params, self.loader_context.loader());
                    self.screens.push(Screen::SplitMap(screen));
                }
            }
            Route::PostSplit(params) => {
                info!(
                    "Opening split summary for {} at point {}",
                    params.file_reference, params.split_index
                );
                let screen = PostSplitScreen::new(params, self.loader_context.loader());
                self.screens.push(Screen::PostSplit(screen));
            }
            Route::Back => {
                if self.screens.len() <= 1 {
                    return false;
                }
                debug!("Closing screen {}", self.screens.len());
                self.screens.pop();
            }
        }
        true
    }

    /// Draw the current screen and apply the navigation it requested
    pub fn render(&mut self, ctx: &egui::Context) -> Option<RenderedView> {
        let mut requests: Vec<Route> = Vec::new();
        let rendered = match self.screens.last_mut()? {
            Screen::SplitMap(screen) => {
                screen.show(ctx, &self.theme, &self.config.split_label, &mut requests)
            }
            Screen::PostSplit(screen) => screen.show(ctx, &self.theme, &mut requests),
        };

        for route in requests {
            if !self.navigate(route) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
        Some(rendered)
    }
}

impl eframe::App for GpxSplitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render(ctx);
    }
}
