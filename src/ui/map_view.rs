use egui::{Align, Button, Layout, RichText, Slider, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};
use itertools::Itertools;

use super::theme::Theme;
use crate::track::Track;

const CONTROLS_HEIGHT: f32 = 90.;
const BUTTON_WIDTH: f32 = 110.;

/// Per-track state of the map view: projected coordinates and distances are
/// computed once, the selected index follows the slider.
#[derive(Debug, Clone, Default)]
pub struct MapViewState {
    selected_index: usize,
    projected: Vec<[f64; 2]>,
    distances_m: Vec<f64>,
}

impl MapViewState {
    pub fn new(track: &Track) -> Self {
        Self {
            selected_index: 0,
            projected: track.projected_points(),
            distances_m: track.cumulative_distances_m(),
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Select `index`, clamped to the last point of the track
    pub fn select(&mut self, index: usize) {
        self.selected_index = index.min(self.last_index());
    }

    fn last_index(&self) -> usize {
        self.projected.len().saturating_sub(1)
    }

    pub fn selected_distance_m(&self) -> f64 {
        self.distances_m
            .get(self.selected_index)
            .copied()
            .unwrap_or_default()
    }

    pub fn total_distance_m(&self) -> f64 {
        self.distances_m.last().copied().unwrap_or_default()
    }

    /// Index of the projected point closest to `target`
    pub fn nearest_index(&self, target: [f64; 2]) -> Option<usize> {
        self.projected.iter().position_min_by(|a, b| {
            squared_distance(a, &target).total_cmp(&squared_distance(b, &target))
        })
    }
}

fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Map display for a [`Track`] with an optional position slider and an
/// action button that reports the selected point index.
pub struct GpxMapView<'a> {
    track: &'a Track,
    theme: &'a Theme,
    show_slider: bool,
    action_label: &'a str,
}

impl<'a> GpxMapView<'a> {
    pub fn new(track: &'a Track, theme: &'a Theme) -> Self {
        Self {
            track,
            theme,
            show_slider: false,
            action_label: "OK",
        }
    }

    pub fn show_slider(mut self, show_slider: bool) -> Self {
        self.show_slider = show_slider;
        self
    }

    pub fn action_label(mut self, action_label: &'a str) -> Self {
        self.action_label = action_label;
        self
    }

    /// Draw the map. Returns the selected index when the action button is
    /// pressed.
    pub fn show(self, ui: &mut Ui, state: &mut MapViewState) -> Option<usize> {
        let selected = state.selected_index;
        let theme = self.theme;

        let plot_height = (ui.available_height() - CONTROLS_HEIGHT).max(100.);
        let plot_response = Plot::new("gpx_map")
            .height(plot_height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_background(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                if state.projected.is_empty() {
                    return;
                }
                let before = PlotPoints::new(state.projected[..=selected].to_vec());
                let after = PlotPoints::new(state.projected[selected..].to_vec());
                plot_ui.line(
                    Line::new("Before split", before)
                        .color(theme.secondary)
                        .width(3.),
                );
                plot_ui.line(Line::new("After split", after).color(theme.light).width(3.));

                let endpoints = vec![state.projected[0], state.projected[state.last_index()]];
                plot_ui.points(
                    Points::new("Start / finish", PlotPoints::new(endpoints))
                        .color(theme.primary)
                        .shape(MarkerShape::Square)
                        .radius(5.),
                );
                plot_ui.points(
                    Points::new("Split point", PlotPoints::new(vec![state.projected[selected]]))
                        .color(theme.error)
                        .radius(8.),
                );
            });

        if plot_response.response.clicked()
            && let Some(mouse_pos) = plot_response.response.interact_pointer_pos()
        {
            let value = plot_response.transform.value_from_position(mouse_pos);
            if let Some(index) = state.nearest_index([value.x, value.y]) {
                state.select(index);
            }
        }

        let mut pressed = None;
        ui.add_space(8.);
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let button = Button::new(
                RichText::new(self.action_label)
                    .strong()
                    .color(theme.dark),
            )
            .fill(theme.secondary)
            .min_size(egui::vec2(BUTTON_WIDTH, 32.));
            if ui.add(button).clicked() {
                pressed = Some(state.selected_index);
            }

            if self.show_slider {
                ui.spacing_mut().slider_width = (ui.available_width() - 80.).max(50.);
                let mut index = state.selected_index;
                let max_index = state.last_index();
                ui.add(Slider::new(&mut index, 0..=max_index).text("point"));
                state.select(index);
            }
        });

        ui.label(
            RichText::new(format!(
                "{} · {:.2} km of {:.2} km",
                self.track.name.as_deref().unwrap_or("Track"),
                state.selected_distance_m() / 1000.,
                state.total_distance_m() / 1000.
            ))
            .color(theme.light),
        );

        pressed
    }
}
