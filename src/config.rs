//! Dashboard configuration

use std::path::PathBuf;
use std::sync::Arc;

/// File read at startup, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "pmi_scores_by_year.csv";

/// Process-wide settings, fixed for the lifetime of the process.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// PMI table loaded once at startup
    pub data_path: PathBuf,

    /// Chart height in points, large enough to label many words
    pub chart_height: f32,

    /// Initial minimum PMI threshold of every session
    pub default_min_pmi: f64,

    /// Increment of the threshold input
    pub min_pmi_step: f64,

    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}
//
impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            chart_height: 800.0,
            default_min_pmi: -10.0,
            min_pmi_step: 0.1,
            window_size: [1280.0, 960.0],
            min_window_size: [640.0, 480.0],
        }
    }
}
//
impl Config {
    /// Default configuration behind a shared handle
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}
