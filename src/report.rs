use std::fmt::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::model::{PredictionRecord, PredictionTable};
use crate::data::query::{self, Label};
use crate::state::{PREVIEW_LIMIT, QUICK_TEST_LIMIT};
use crate::ui::panels::thousands;

// ---------------------------------------------------------------------------
// Headless text report (`--report`)
// ---------------------------------------------------------------------------

/// Summary, quick-test ids and both preview tables as plain text.
pub fn render(table: &PredictionTable) -> Result<String> {
    let summary = query::summarize(table);
    let mut out = String::new();

    writeln!(
        out,
        "Columns: id = {:?}, prediction = {:?}",
        table.id_column_name(),
        table.prediction_column_name()
    )?;
    writeln!(out, "Total transactions: {}", thousands(summary.total))?;
    writeln!(
        out,
        "Legitimate: {} ({:.2}%)",
        thousands(summary.legit_count),
        summary.legit_rate_percent()
    )?;
    writeln!(
        out,
        "Fraudulent: {} ({:.2}%)",
        thousands(summary.fraud_count),
        summary.fraud_rate_percent
    )?;
    if summary.non_binary > 0 {
        writeln!(out, "Non-binary predictions: {}", thousands(summary.non_binary))?;
    }

    for (label, name) in [(Label::Legitimate, "legitimate"), (Label::Fraudulent, "fraudulent")] {
        let ids: Vec<String> = query::quick_test_ids(table, label, QUICK_TEST_LIMIT)
            .iter()
            .map(|id| id.to_string())
            .collect();
        writeln!(out, "Quick-test {name} ids: [{}]", ids.join(", "))?;
    }

    for (label, name) in [(Label::Fraudulent, "Fraudulent"), (Label::Legitimate, "Legitimate")] {
        writeln!(out)?;
        writeln!(out, "{name} transactions:")?;
        let rows = query::sample_label(table, label, PREVIEW_LIMIT);
        if rows.is_empty() {
            writeln!(out, "(none)")?;
        } else {
            writeln!(out, "{}", preview_table(table, &rows)?)?;
        }
    }

    Ok(out)
}

/// Format rows as an ASCII table via Arrow's pretty printer.
fn preview_table(table: &PredictionTable, rows: &[&PredictionRecord]) -> Result<String> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|c| Field::new(c, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = (0..table.columns().len())
        .map(|idx| {
            let values: Vec<String> = rows.iter().map(|r| r.get(idx).to_string()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building preview batch")?;
    Ok(pretty_format_batches(&[batch])
        .context("formatting preview batch")?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn sample_table() -> PredictionTable {
        let rows = [(3663549, 1.0), (3663550, 0.0), (3663551, 0.0)];
        let records = rows
            .iter()
            .map(|(id, p)| {
                PredictionRecord::new(vec![
                    CellValue::Integer(*id),
                    CellValue::String("W".into()),
                    CellValue::Float(*p),
                ])
            })
            .collect();
        PredictionTable::new(
            vec!["TransactionID".into(), "ProductCD".into(), "prediction".into()],
            records,
        )
        .unwrap()
    }

    #[test]
    fn report_lists_metrics_and_samples() {
        let text = render(&sample_table()).unwrap();
        assert!(text.contains("Total transactions: 3"), "{text}");
        assert!(text.contains("Fraudulent: 1 (33.33%)"), "{text}");
        assert!(text.contains("Legitimate: 2 (66.67%)"), "{text}");
        assert!(text.contains("Quick-test legitimate ids: [3663550, 3663551]"), "{text}");
        assert!(text.contains("Quick-test fraudulent ids: [3663549]"), "{text}");
        assert!(text.contains("| TransactionID |"), "{text}");
    }

    #[test]
    fn report_of_empty_table_does_not_fail() {
        let table = PredictionTable::new(vec!["a".into(), "b".into()], vec![]).unwrap();
        let text = render(&table).unwrap();
        assert!(text.contains("Fraudulent: 0 (0.00%)"), "{text}");
        assert!(text.contains("(none)"), "{text}");
    }
}
