use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::model::{PredictionRecord, PredictionTable};
use crate::data::query::{Label, LookupError, LookupOutcome, Summary};
use crate::state::{AppState, LookupView, PREVIEW_LIMIT};
use crate::ui::plot;

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
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!("{} predictions loaded", thousands(table.len())));
            if let Some(path) = &state.source_path {
                ui.label(RichText::new(path.display().to_string()).weak());
            }
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
        .set_title("Open predictions")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

/// Render the whole dashboard body, or the load error when there is no table.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let (Some(table), Some(summary)) = (state.table.clone(), state.summary()) else {
        no_table(ui, state);
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            header(ui, &table);
            ui.separator();

            ui.heading("Prediction Summary");
            metrics_row(ui, state, &summary);
            ui.separator();

            ui.heading("Transaction Lookup");
            lookup_panel(ui, state, &table);
            ui.separator();

            ui.heading("Quick Test");
            quick_test_panel(ui, state);
            ui.separator();

            ui.heading("Prediction Distribution");
            ui.columns(2, |cols| {
                plot::distribution_chart(&mut cols[0], &summary);
                statistics_grid(&mut cols[1], state, &summary);
            });
            ui.separator();

            ui.heading("Sample Predictions");
            preview_tabs(ui, state, &table);
        });
}

fn no_table(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
        Some(msg) => {
            ui.label(RichText::new(msg).color(Color32::RED).heading());
        }
        None => {
            ui.heading("Open a predictions file to begin  (File → Open…)");
        }
    });
}

fn header(ui: &mut Ui, table: &PredictionTable) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Real-Time Fraud Detection System").size(28.0).strong());
    });
    ui.collapsing("System Architecture", |ui: &mut Ui| {
        ui.label("Data (S3) → Spark on EMR → ML Model (GBT) → Predictions → Lambda API → Dashboard");
        ui.label(
            "Predictions are produced upstream; this dashboard only reads the exported file.",
        );
        ui.label(format!(
            "Identifier column: {}   Prediction column: {}   ({} columns)",
            table.id_column_name(),
            table.prediction_column_name(),
            table.columns().len()
        ));
    });
}

fn metrics_row(ui: &mut Ui, state: &AppState, summary: &Summary) {
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Transactions", &thousands(summary.total), None);
        metric(
            &mut cols[1],
            "Legitimate",
            &thousands(summary.legit_count),
            Some((format!("{:.1}%", summary.legit_rate_percent()), color::LEGIT)),
        );
        metric(
            &mut cols[2],
            "Fraudulent",
            &thousands(summary.fraud_count),
            Some((format!("{:.1}%", summary.fraud_rate_percent), color::FRAUD)),
        );
        metric(
            &mut cols[3],
            "Model",
            &state.config.model_name,
            Some((state.config.model_metric.clone(), Color32::GRAY)),
        );
    });
    if summary.non_binary > 0 {
        ui.label(
            RichText::new(format!(
                "{} prediction values are neither 0 nor 1 and are counted as legitimate",
                thousands(summary.non_binary)
            ))
            .color(color::WARNING),
        );
    }
}

fn metric(ui: &mut Ui, label: &str, value: &str, delta: Option<(String, Color32)>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
        if let Some((text, c)) = delta {
            ui.label(RichText::new(text).color(c));
        }
    });
}

fn lookup_panel(ui: &mut Ui, state: &mut AppState, table: &PredictionTable) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Enter Transaction ID:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.lookup_input)
                .hint_text("e.g., 3663549")
                .desired_width(180.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Check Transaction").clicked() || submitted {
            state.submit_lookup();
        }
    });

    let Some(view) = &state.lookup_view else {
        return;
    };
    match view {
        LookupView::Outcome { id, outcome } => match outcome {
            LookupOutcome::Fraudulent { .. } => alert(
                ui,
                color::FRAUD,
                "FRAUD DETECTED",
                &format!("Transaction {id} is flagged as FRAUDULENT"),
                "Recommended Action: Block transaction and verify with cardholder",
            ),
            LookupOutcome::Legitimate { .. } => alert(
                ui,
                color::LEGIT,
                "TRANSACTION SAFE",
                &format!("Transaction {id} is LEGITIMATE"),
                "No action required",
            ),
            LookupOutcome::NotFound => {
                ui.label(
                    RichText::new(format!("Transaction ID {id} not found in dataset"))
                        .color(color::WARNING),
                );
            }
        },
        LookupView::Error(e) => {
            let c = match e {
                LookupError::EmptyInput => color::WARNING,
                LookupError::InvalidId(_) => Color32::RED,
            };
            ui.label(RichText::new(e.to_string()).color(c));
        }
    }

    if let Some(record) = state.matched_record() {
        record_table(ui, "lookup_match", table, &[record]);
    }
}

fn alert(ui: &mut Ui, accent: Color32, title: &str, body: &str, action: &str) {
    egui::Frame::default()
        .fill(color::tint(accent, 0.93))
        .stroke(Stroke::new(2.0, accent))
        .corner_radius(egui::CornerRadius::same(5))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(title).strong().size(18.0).color(accent));
            ui.label(RichText::new(body).color(Color32::BLACK));
            ui.label(RichText::new(action).color(Color32::DARK_GRAY));
        });
}

fn quick_test_panel(ui: &mut Ui, state: &mut AppState) {
    ui.label("Click to test sample transactions:");
    let legit = state.quick_test_ids(Label::Legitimate);
    let fraud = state.quick_test_ids(Label::Fraudulent);

    ui.horizontal(|ui: &mut Ui| {
        for (ids, label) in [(legit, Label::Legitimate), (fraud, Label::Fraudulent)] {
            for id in ids {
                let text = RichText::new(id.to_string()).color(color::label_color(label));
                if ui.button(text).clicked() {
                    state.quick_test(id, label);
                }
            }
        }
    });

    if let Some(verdict) = &state.quick_test {
        let (word, c) = match verdict.label {
            Label::Fraudulent => ("FRAUDULENT", color::FRAUD),
            Label::Legitimate => ("LEGITIMATE", color::LEGIT),
        };
        ui.label(RichText::new(format!("Transaction {}: {word}", verdict.id)).color(c));
    }
}

fn statistics_grid(ui: &mut Ui, state: &AppState, summary: &Summary) {
    ui.strong("Statistics:");
    egui::Grid::new("statistics_grid")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Total Processed");
            ui.label(thousands(summary.total));
            ui.end_row();

            ui.label("Legitimate");
            ui.label(format!(
                "{} ({:.2}%)",
                thousands(summary.legit_count),
                summary.legit_rate_percent()
            ));
            ui.end_row();

            ui.label("Fraudulent");
            ui.label(format!(
                "{} ({:.2}%)",
                thousands(summary.fraud_count),
                summary.fraud_rate_percent
            ));
            ui.end_row();

            ui.label("Model Used");
            ui.label(&state.config.model_name);
            ui.end_row();
        });
}

fn preview_tabs(ui: &mut Ui, state: &mut AppState, table: &PredictionTable) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.preview_tab, Label::Fraudulent, "Fraudulent Transactions");
        ui.selectable_value(&mut state.preview_tab, Label::Legitimate, "Legitimate Transactions");
    });

    let rows = state.preview(state.preview_tab);
    if rows.is_empty() {
        let msg = match state.preview_tab {
            Label::Fraudulent => "No fraudulent transactions found",
            Label::Legitimate => "No legitimate transactions found",
        };
        ui.label(msg);
        return;
    }
    ui.label(
        RichText::new(format!("First {} rows (of at most {PREVIEW_LIMIT})", rows.len())).weak(),
    );
    record_table(ui, state.preview_tab, table, &rows);
}

/// Plain grid of records with every column of the table.
fn record_table(
    ui: &mut Ui,
    salt: impl std::hash::Hash,
    table: &PredictionTable,
    rows: &[&PredictionRecord],
) {
    ScrollArea::horizontal()
        .id_salt(salt)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(70.0), table.columns().len())
                .header(20.0, |mut header| {
                    for col in table.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|mut body| {
                    for record in rows {
                        body.row(18.0, |mut row| {
                            for idx in 0..table.columns().len() {
                                row.col(|ui: &mut Ui| {
                                    ui.label(record.get(idx).to_string());
                                });
                            }
                        });
                    }
                });
        });
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn groups_digits_by_three() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(506691), "506,691");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
