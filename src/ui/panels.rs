use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use sst_trends::plot::FigureKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – summary and figure selector
// ---------------------------------------------------------------------------

/// Render the left summary panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Figures");
    ui.separator();
    for kind in FigureKind::ALL {
        ui.selectable_value(&mut state.selected, kind, kind.title());
    }
    ui.add_space(8.0);

    ui.heading("Summary");
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("Input: {}", state.config.input.display()));
            ui.label(format!("Records: {}", analysis.series.len()));
            ui.add_space(4.0);
            for line in analysis.summary.lines() {
                ui.label(line);
            }

            let mk = &analysis.summary.mann_kendall;
            egui::CollapsingHeader::new(RichText::new("Mann-Kendall details").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("significant (α = {}): {}", mk.alpha, mk.h));
                    ui.label(format!("z = {:.4}", mk.z));
                    ui.label(format!("Kendall's tau = {:.4}", mk.tau));
                    ui.label(format!("S = {}", mk.s));
                    ui.label(format!("Var(S) = {:.2}", mk.var_s));
                    ui.label(format!("Sen's slope = {:.6} °C/step", mk.slope));
                    ui.label(format!("intercept = {:.4}", mk.intercept));
                });

            let fit = &analysis.summary.regression;
            egui::CollapsingHeader::new(RichText::new("Regression details").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("r = {:.4}", fit.r_value));
                    ui.label(format!("p-value = {:.4e}", fit.p_value));
                    ui.label(format!("slope std. error = {:.3e}", fit.std_err));
                    ui.label(format!("intercept std. error = {:.3}", fit.intercept_std_err));
                });

            if !analysis.cadence_issues.is_empty() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!(
                        "{} cadence issue(s), see log",
                        analysis.cadence_issues.len()
                    ))
                    .color(Color32::YELLOW),
                );
            }
        });
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
            let can_save = !state.figures.is_empty();
            if ui
                .add_enabled(can_save, egui::Button::new("Save figures…"))
                .clicked()
            {
                save_figures_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(analysis) = &state.analysis {
            ui.label(format!(
                "{} daily records, {} year(s)",
                analysis.series.len(),
                analysis.summary.descriptive.year_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open SST export")
        .add_filter("Delimited text", &["csv", "tsv", "tab", "txt"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match state.load_input(&path) {
            Ok(()) => {
                log::info!("Analysed {}", path.display());
            }
            Err(e) => {
                log::error!("Failed to analyse file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_figures_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Save figures to folder")
        .pick_folder();

    if let Some(dir) = dir {
        match state.save_figures(&dir) {
            Ok(n) => {
                state.status_message = None;
                log::info!("Saved {n} figures to {}", dir.display());
            }
            Err(e) => {
                log::error!("Failed to save figures: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
