use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color;
use crate::data::query::Summary;

// ---------------------------------------------------------------------------
// Prediction distribution chart
// ---------------------------------------------------------------------------

/// Two bars: legitimate vs fraudulent counts.
pub fn distribution_chart(ui: &mut Ui, summary: &Summary) {
    let legit = BarChart::new(vec![
        Bar::new(0.0, summary.legit_count as f64)
            .name("Legitimate")
            .fill(color::LEGIT)
            .width(0.6),
    ])
    .name("Legitimate")
    .color(color::LEGIT);

    let fraud = BarChart::new(vec![
        Bar::new(1.0, summary.fraud_count as f64)
            .name("Fraudulent")
            .fill(color::FRAUD)
            .width(0.6),
    ])
    .name("Fraudulent")
    .color(color::FRAUD);

    Plot::new("distribution_chart")
        .legend(Legend::default())
        .height(220.0)
        .y_axis_label("Count")
        .x_axis_formatter(|mark, _range| {
            if (mark.value - mark.value.round()).abs() > 1e-6 {
                return String::new();
            }
            match mark.value.round() as i64 {
                0 => "Legitimate".to_string(),
                1 => "Fraudulent".to_string(),
                _ => String::new(),
            }
        })
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(legit);
            plot_ui.bar_chart(fraud);
        });
}
