use eframe::egui::{self, Ui};

use crate::config::Config;
use crate::data::model::Year;
use crate::state::Session;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the place, year and threshold inputs.
///
/// Widgets only report what the user clicked; the session is updated after
/// each widget so dependent options are current for the next one.
pub fn side_panel(ui: &mut Ui, session: &mut Session, config: &Config) {
    ui.heading("Filters");
    ui.separator();

    // ---- Place ----
    ui.strong("Placename");
    let current_place = session.selection().placename.clone();
    let mut picked_place: Option<Option<String>> = None;
    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt("placename")
            .selected_text(current_place.as_deref().unwrap_or("Select a Placename"))
            .width(160.0)
            .show_ui(ui, |ui: &mut Ui| {
                for place in session.placenames() {
                    let selected = current_place.as_deref() == Some(place.as_str());
                    if ui.selectable_label(selected, place).clicked() {
                        picked_place = Some(Some(place.clone()));
                    }
                }
            });
        if current_place.is_some() && ui.small_button("✖").on_hover_text("Clear").clicked() {
            picked_place = Some(None);
        }
    });
    if let Some(place) = picked_place {
        session.set_placename(place);
    }
    ui.add_space(8.0);

    // ---- Year ----
    ui.strong("Year");
    let current_year = session.selection().year;
    let mut picked_year: Option<Year> = None;
    let year_text = current_year.map_or_else(|| "Select a Year".to_string(), |y| y.to_string());
    ui.add_enabled_ui(!session.year_options().is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("year")
            .selected_text(year_text)
            .width(160.0)
            .show_ui(ui, |ui: &mut Ui| {
                for opt in session.year_options() {
                    if ui
                        .selectable_label(current_year == Some(opt.value), &opt.label)
                        .clicked()
                    {
                        picked_year = Some(opt.value);
                    }
                }
            });
    });
    if let Some(year) = picked_year {
        session.set_year(Some(year));
    }
    ui.add_space(8.0);

    // ---- Threshold ----
    ui.strong("Minimum PMI Score");
    let mut min_pmi = session.selection().min_pmi;
    let response = ui.add(
        egui::DragValue::new(&mut min_pmi)
            .speed(config.min_pmi_step)
            .max_decimals(6),
    );
    if response.changed() {
        session.set_min_pmi(min_pmi);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and dataset counts.
pub fn top_bar(ui: &mut Ui, session: &Session) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("PMI Scores Dashboard");
        ui.separator();
        ui.label(format!(
            "{} records, {} places",
            session.dataset().len(),
            session.placenames().len()
        ));
        if !session.chart().is_blank() {
            ui.separator();
            ui.label(format!("{} words shown", session.chart().bars().len()));
        }
    });
}
