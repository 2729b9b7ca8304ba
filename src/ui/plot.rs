use eframe::egui::{self, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Figure view (central panel)
// ---------------------------------------------------------------------------

/// Show the selected figure, scaled down to the available space.
pub fn figure_view(ui: &mut Ui, state: &mut AppState) {
    if state.analysis.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an SST export to analyse  (File → Open…)");
        });
        return;
    }

    let kind = state.selected;
    let Some(texture) = state.texture(ui.ctx(), kind) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(format!("The {kind} figure is not available."));
        });
        return;
    };

    let sized = egui::load::SizedTexture::from_handle(&texture);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(egui::Image::from_texture(sized).shrink_to_fit());
    });
}
