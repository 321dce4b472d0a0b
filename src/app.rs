use std::sync::Arc;

use eframe::egui;

use crate::config::Config;
use crate::data::model::Dataset;
use crate::state::Session;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PmiDashboardApp {
    pub session: Session,
    pub config: Arc<Config>,
}

impl PmiDashboardApp {
    pub fn new(dataset: Arc<Dataset>, config: Arc<Config>) -> Self {
        Self {
            session: Session::new(dataset, config.default_min_pmi),
            config,
        }
    }
}

impl eframe::App for PmiDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.session);
        });

        // ---- Left side panel: the three inputs ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session, &self.config);
            });

        // ---- Central panel: chart and table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::pmi_view(ui, &self.session, &self.config);
        });
    }
}
