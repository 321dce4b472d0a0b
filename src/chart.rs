use std::collections::BTreeMap;

use crate::data::filter::{filtered_records, ChartFilter};
use crate::data::model::{Dataset, Record, Year};

// ---------------------------------------------------------------------------
// Chart figure – what the plot renders, independent of egui
// ---------------------------------------------------------------------------

/// One bar: a word and its (summed) PMI.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub word: String,
    pub pmi: f64,
}

/// Output of the chart derivation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChartFigure {
    /// Place or year not selected: nothing to draw.
    #[default]
    Blank,
    /// A titled chart, possibly with zero bars.
    Bars { title: String, bars: Vec<ChartBar> },
}

impl ChartFigure {
    /// Derive the chart for a selection. Missing place or year gives
    /// [`ChartFigure::Blank`].
    pub fn build(dataset: &Dataset, placename: Option<&str>, year: Option<Year>, min_pmi: f64) -> Self {
        let Some(filter) = ChartFilter::from_selection(placename, year, min_pmi) else {
            return ChartFigure::Blank;
        };
        let rows = filtered_records(dataset, &filter);
        ChartFigure::Bars {
            title: chart_title(filter.placename, filter.year),
            bars: bars_total_ascending(&rows),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ChartFigure::Blank => None,
            ChartFigure::Bars { title, .. } => Some(title),
        }
    }

    /// Bars in display order; empty for a blank chart.
    pub fn bars(&self) -> &[ChartBar] {
        match self {
            ChartFigure::Blank => &[],
            ChartFigure::Bars { bars, .. } => bars,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ChartFigure::Blank)
    }
}

pub fn chart_title(placename: &str, year: Year) -> String {
    format!("PMI Scores for {placename} in {year}")
}

/// One bar per word, heights summed when a word repeats, ordered by total
/// ascending. Ties keep alphabetical word order.
pub fn bars_total_ascending(rows: &[&Record]) -> Vec<ChartBar> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.word.as_str()).or_insert(0.0) += row.pmi;
    }
    let mut bars: Vec<ChartBar> = totals
        .into_iter()
        .map(|(word, pmi)| ChartBar {
            word: word.to_string(),
            pmi,
        })
        .collect();
    bars.sort_by(|a, b| a.pmi.total_cmp(&b.pmi));
    bars
}
