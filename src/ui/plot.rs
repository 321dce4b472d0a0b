use std::ops::RangeInclusive;

use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridInput, GridMark, Plot};

use crate::chart::ChartBar;
use crate::color::DivergingScale;
use crate::config::Config;
use crate::state::Session;

// ---------------------------------------------------------------------------
// PMI bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart for the current selection, followed by its rows.
pub fn pmi_view(ui: &mut Ui, session: &Session, config: &Config) {
    let chart = session.chart();
    let Some(title) = chart.title() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a placename to view PMI scores");
        });
        return;
    };
    let bars = chart.bars();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(title);
            pmi_bar_chart(ui, bars, config.chart_height);
            ui.separator();
            pmi_table(ui, bars);
        });
}

/// Bars sit at x = 0, 1, 2, … in display order; every category gets its own
/// axis label.
fn pmi_bar_chart(ui: &mut Ui, bars: &[ChartBar], height: f32) {
    let scale = DivergingScale::for_bars(bars);
    let chart_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Bar::new(i as f64, bar.pmi)
                .name(&bar.word)
                .fill(scale.color_for(bar.pmi))
                .width(0.8)
        })
        .collect();

    let words: Vec<String> = bars.iter().map(|b| b.word.clone()).collect();
    let n_categories = bars.len();

    Plot::new("pmi_chart")
        .height(height)
        .x_axis_label("Word")
        .y_axis_label("PMI")
        .x_grid_spacer(move |input| category_marks(&input, n_categories))
        .x_axis_formatter(move |mark, range| category_label(&words, mark, range))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars).name("PMI"));
        });
}

/// One grid mark per category inside the visible bounds, never thinned.
fn category_marks(input: &GridInput, n_categories: usize) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    (0..n_categories)
        .map(|i| i as f64)
        .filter(|&x| x >= min.floor() && x <= max.ceil())
        .map(|value| GridMark {
            value,
            step_size: 1.0,
        })
        .collect()
}

/// The word whose bar sits at `mark`, or nothing between categories.
fn category_label(words: &[String], mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    words.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Table of charted rows
// ---------------------------------------------------------------------------

fn pmi_table(ui: &mut Ui, bars: &[ChartBar]) {
    if bars.is_empty() {
        ui.label("No words meet the minimum PMI score.");
        return;
    }
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Word");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("PMI");
            });
        })
        .body(|body| {
            body.rows(18.0, bars.len(), |mut row| {
                let bar = &bars[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&bar.word);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", bar.pmi));
                });
            });
        });
}
