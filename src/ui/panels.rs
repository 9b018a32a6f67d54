use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – date range
// ---------------------------------------------------------------------------

/// Render the left panel with the two date pickers.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("🚲").size(48.0));
    });
    ui.add_space(4.0);

    ui.heading("Date range");
    ui.separator();

    let Some(span) = state.span else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut start = state.start;
    let mut end = state.end;

    egui::Grid::new("date_range")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
            ui.end_row();

            ui.label("To");
            ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
            ui.end_row();
        });

    // Picked dates outside the data are pulled back to its bounds.
    let start = start.clamp(span.start, span.end);
    let end = end.clamp(span.start, span.end);
    if start != state.start || end != state.end {
        state.set_range(start, end);
    }

    ui.add_space(4.0);
    if ui.button("Reset range").clicked() {
        state.reset_range();
    }

    ui.separator();
    ui.label(
        RichText::new(format!("Data covers {} to {}", span.start, span.end))
            .small()
            .weak(),
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.dataset.is_some() {
            let in_range = state.dashboard.as_ref().map_or(0, |d| d.rows);
            ui.label(format!(
                "{} days loaded, {} in range",
                state.dataset_len(),
                in_range
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open daily bike sharing data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
