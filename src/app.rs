use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FraudLensApp {
    pub state: AppState,
}

impl FraudLensApp {
    /// Build the app and load the configured predictions file.
    pub fn new(config: DashboardConfig) -> Self {
        let path = config.predictions_path.clone();
        let mut state = AppState::new(config);
        state.open(&path);
        Self { state }
    }
}

impl eframe::App for FraudLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &mut self.state);
        });
    }
}
