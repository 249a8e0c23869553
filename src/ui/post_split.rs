use egui::{Align, CentralPanel, Frame, Grid, Layout, Margin, RichText, Ui};

use super::split_map::LOADING_REPAINT_INTERVAL;
use super::theme::Theme;
use super::{RenderedView, TITLE_TEXT_SIZE, error_view, loading_view};
use crate::errors::GpxSplitError;
use crate::loader::{LoadState, TrackLoader, ViewState};
use crate::navigation::{Navigator, PostSplitParams, Route};
use crate::track::Track;

/// Point count and length of one side of the split
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub points: usize,
    pub distance_m: f64,
}

impl From<&Track> for SegmentSummary {
    fn from(track: &Track) -> Self {
        Self {
            points: track.len(),
            distance_m: track.total_distance_m(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    pub track_name: Option<String>,
    pub first: SegmentSummary,
    pub second: SegmentSummary,
}

impl SplitSummary {
    pub fn compute(track: &Track, split_index: usize) -> Result<Self, GpxSplitError> {
        let (first, second) = track.split_at(split_index)?;
        Ok(Self {
            track_name: track.name.clone(),
            first: SegmentSummary::from(&first),
            second: SegmentSummary::from(&second),
        })
    }
}

/// Screen shown after a split point was chosen. It reloads the track and
/// summarizes both segments. The access token is carried but never shown.
pub struct PostSplitScreen {
    params: PostSplitParams,
    load_state: LoadState,
    loader: TrackLoader,
    summary: Option<Result<SplitSummary, String>>,
}

impl PostSplitScreen {
    pub fn new(params: PostSplitParams, loader: TrackLoader) -> Self {
        let mut load_state = LoadState::new();
        if let Some(ticket) = load_state.begin(&params.file_reference) {
            loader.spawn(ticket);
        }
        Self {
            params,
            load_state,
            loader,
            summary: None,
        }
    }

    pub fn params(&self) -> &PostSplitParams {
        &self.params
    }

    pub fn poll(&mut self) {
        for outcome in self.loader.poll() {
            if self.load_state.apply(outcome)
                && let ViewState::Loaded(track) = self.load_state.view()
            {
                self.summary = Some(
                    SplitSummary::compute(track, self.params.split_index)
                        .map_err(|e| e.to_string()),
                );
            }
        }
    }

    pub fn summary(&self) -> Option<&Result<SplitSummary, String>> {
        self.summary.as_ref()
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        theme: &Theme,
        navigator: &mut dyn Navigator,
    ) -> RenderedView {
        self.poll();

        let mut go_back = false;
        let summary = self
            .summary
            .as_ref()
            .map(|s| s.as_ref().map_err(String::as_str));
        let split_index = self.params.split_index;
        let rendered = CentralPanel::default()
            .frame(Frame::default().fill(theme.dark).inner_margin(Margin::same(8)))
            .show(ctx, |ui| {
                let rendered = match (self.load_state.view(), summary) {
                    (ViewState::Error(message), _) | (_, Some(Err(message))) => {
                        error_view(ui, theme, message);
                        RenderedView::Error
                    }
                    (ViewState::Loaded(_), Some(Ok(summary))) => {
                        summary_view(ui, theme, summary, split_index);
                        RenderedView::Summary
                    }
                    _ => {
                        loading_view(ui, theme);
                        RenderedView::Loading
                    }
                };
                ui.with_layout(Layout::bottom_up(Align::LEFT), |ui| {
                    go_back = ui.button("Back").clicked();
                });
                rendered
            })
            .inner;

        if rendered == RenderedView::Loading {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }
        if go_back {
            navigator.navigate(Route::Back);
        }
        rendered
    }
}

impl Drop for PostSplitScreen {
    fn drop(&mut self) {
        self.load_state.teardown();
    }
}

fn summary_view(ui: &mut Ui, theme: &Theme, summary: &SplitSummary, split_index: usize) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 4.);
        ui.label(
            RichText::new(format!(
                "{} split at point {}",
                summary.track_name.as_deref().unwrap_or("Track"),
                split_index
            ))
            .color(theme.light)
            .size(TITLE_TEXT_SIZE),
        );
        ui.add_space(12.);
        Grid::new("split_summary")
            .num_columns(3)
            .spacing([24., 8.])
            .show(ui, |ui| {
                for (label, segment) in [("First", &summary.first), ("Second", &summary.second)] {
                    ui.label(RichText::new(label).color(theme.secondary).strong());
                    ui.label(RichText::new(format!("{} points", segment.points)).color(theme.light));
                    ui.label(
                        RichText::new(format!("{:.2} km", segment.distance_m / 1000.))
                            .color(theme.light),
                    );
                    ui.end_row();
                }
            });
    });
}
