use eframe::egui;

use crate::color;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EsgLensApp {
    pub state: AppState,
}

impl EsgLensApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = color::BACKGROUND;
        visuals.extreme_bg_color = color::BACKGROUND;
        cc.egui_ctx.set_visuals(visuals);
        Self { state }
    }
}

impl eframe::App for EsgLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
        });
    }
}
