use std::time::Duration;

use egui::{CentralPanel, Frame, Margin};
use log::info;

use super::map_view::{GpxMapView, MapViewState};
use super::theme::Theme;
use super::{RenderedView, error_view, loading_view};
use crate::loader::{LoadState, TrackLoader, ViewState};
use crate::navigation::{Navigator, PostSplitParams, Route, SplitMapParams};

pub(crate) const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(50);

/// Screen that loads a GPX file, shows it on the map and lets the user pick
/// the split point.
///
/// The load starts when the screen is created and again whenever the file
/// reference changes. Dropping the screen tears down the load state so a
/// late result is never applied.
pub struct SplitMapScreen {
    params: SplitMapParams,
    load_state: LoadState,
    loader: TrackLoader,
    map_state: MapViewState,
}

impl SplitMapScreen {
    pub fn new(params: SplitMapParams, loader: TrackLoader) -> Self {
        let mut screen = Self {
            params,
            load_state: LoadState::new(),
            loader,
            map_state: MapViewState::default(),
        };
        screen.start_load();
        screen
    }

    fn start_load(&mut self) {
        if let Some(ticket) = self.load_state.begin(&self.params.file_reference) {
            self.map_state = MapViewState::default();
            self.loader.spawn(ticket);
        }
    }

    pub fn params(&self) -> &SplitMapParams {
        &self.params
    }

    /// Replace the navigation params. A new file reference restarts the load,
    /// the same reference keeps the current result.
    pub fn set_params(&mut self, params: SplitMapParams) {
        self.params = params;
        self.start_load();
    }

    /// Apply load results that have arrived since the last call
    pub fn poll(&mut self) {
        for outcome in self.loader.poll() {
            if self.load_state.apply(outcome)
                && let ViewState::Loaded(track) = self.load_state.view()
            {
                self.map_state = MapViewState::new(track);
            }
        }
    }

    pub fn view(&self) -> ViewState<'_> {
        self.load_state.view()
    }

    pub fn map_state_mut(&mut self) -> &mut MapViewState {
        &mut self.map_state
    }

    /// Forward the chosen split point to the next screen
    pub fn on_split_selected(&self, index: usize, navigator: &mut dyn Navigator) {
        info!(
            "Split selected at point {} of {}",
            index, self.params.file_reference
        );
        navigator.navigate(Route::PostSplit(PostSplitParams {
            file_reference: self.params.file_reference.clone(),
            split_index: index,
            access_token: self.params.access_token.clone(),
        }));
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        theme: &Theme,
        split_label: &str,
        navigator: &mut dyn Navigator,
    ) -> RenderedView {
        self.poll();

        let mut split = None;
        let rendered = CentralPanel::default()
            .frame(Frame::default().fill(theme.dark).inner_margin(Margin::same(8)))
            .show(ctx, |ui| match self.load_state.view() {
                ViewState::Loading => {
                    loading_view(ui, theme);
                    RenderedView::Loading
                }
                ViewState::Error(message) => {
                    error_view(ui, theme, message);
                    RenderedView::Error
                }
                ViewState::Loaded(track) => {
                    split = GpxMapView::new(track, theme)
                        .show_slider(true)
                        .action_label(split_label)
                        .show(ui, &mut self.map_state);
                    RenderedView::Map
                }
            })
            .inner;

        if rendered == RenderedView::Loading {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }
        if let Some(index) = split {
            self.on_split_selected(index, navigator);
        }
        rendered
    }
}

impl Drop for SplitMapScreen {
    fn drop(&mut self) {
        self.load_state.teardown();
    }
}
