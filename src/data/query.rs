use super::model::{CellValue, PredictionRecord, PredictionTable};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Aggregate counts for the metrics panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub fraud_count: usize,
    pub legit_count: usize,
    /// `fraud_count / total * 100`, or `0.0` for an empty table.
    pub fraud_rate_percent: f64,
    /// Prediction values that are neither 0 nor 1 (counted as legitimate).
    pub non_binary: usize,
}

impl Summary {
    pub fn legit_rate_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 - self.fraud_rate_percent
        }
    }
}

pub fn summarize(table: &PredictionTable) -> Summary {
    let total = table.len();
    let mut fraud_count = 0;
    let mut non_binary = 0;
    for record in table.records() {
        let prediction = table.prediction_of(record);
        if prediction.is_fraud_label() {
            fraud_count += 1;
        } else if prediction.is_non_binary_label() {
            non_binary += 1;
        }
    }
    let fraud_rate_percent = if total > 0 {
        fraud_count as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Summary {
        total,
        fraud_count,
        legit_count: total - fraud_count,
        fraud_rate_percent,
        non_binary,
    }
}

// ---------------------------------------------------------------------------
// Point lookup
// ---------------------------------------------------------------------------

/// Verdict for a looked-up transaction.  Matches carry the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Fraudulent { row: usize },
    Legitimate { row: usize },
    NotFound,
}

/// User input that cannot be looked up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Please enter a Transaction ID")]
    EmptyInput,

    #[error("Please enter a valid numeric Transaction ID (got {0:?})")]
    InvalidId(String),
}

/// Find the first record (in file order) whose id equals `raw_id`.
pub fn lookup(table: &PredictionTable, raw_id: &str) -> Result<LookupOutcome, LookupError> {
    let trimmed = raw_id.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyInput);
    }
    let id: i64 = trimmed
        .parse()
        .map_err(|_| LookupError::InvalidId(raw_id.to_string()))?;

    let outcome = table
        .records()
        .iter()
        .position(|r| table.id_of(r).matches_id(id))
        .map(|row| {
            if table.is_fraud(&table.records()[row]) {
                LookupOutcome::Fraudulent { row }
            } else {
                LookupOutcome::Legitimate { row }
            }
        })
        .unwrap_or(LookupOutcome::NotFound);

    log::debug!("lookup {id} -> {outcome:?}");
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// The two canonical sampling predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Fraudulent,
    Legitimate,
}

impl Label {
    pub fn matches(self, table: &PredictionTable, record: &PredictionRecord) -> bool {
        match self {
            Label::Fraudulent => table.is_fraud(record),
            Label::Legitimate => !table.is_fraud(record),
        }
    }
}

/// First `limit` records, in table order, for which `predicate` holds.
pub fn sample<'t, P>(
    table: &'t PredictionTable,
    predicate: P,
    limit: usize,
) -> Vec<&'t PredictionRecord>
where
    P: Fn(&PredictionTable, &PredictionRecord) -> bool,
{
    table
        .records()
        .iter()
        .filter(|r| predicate(table, *r))
        .take(limit)
        .collect()
}

/// [`sample`] with a [`Label`] predicate.
pub fn sample_label(table: &PredictionTable, label: Label, limit: usize) -> Vec<&PredictionRecord> {
    sample(table, |t, r| label.matches(t, r), limit)
}

/// Identifiers of the first `limit` records with the given label.
pub fn quick_test_ids(table: &PredictionTable, label: Label, limit: usize) -> Vec<CellValue> {
    sample_label(table, label, limit)
        .into_iter()
        .map(|r| table.id_of(r).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a two-column table of `(id, prediction)` rows.
    fn table(rows: &[(i64, CellValue)]) -> PredictionTable {
        let records = rows
            .iter()
            .map(|(id, pred)| PredictionRecord::new(vec![CellValue::Integer(*id), pred.clone()]))
            .collect();
        PredictionTable::new(vec!["TransactionID".into(), "prediction".into()], records).unwrap()
    }

    fn ints(preds: &[i64]) -> PredictionTable {
        let rows: Vec<(i64, CellValue)> = preds
            .iter()
            .enumerate()
            .map(|(i, p)| (i as i64 + 1, CellValue::Integer(*p)))
            .collect();
        table(&rows)
    }

    #[test]
    fn summary_counts_fraud_and_legit() {
        let s = summarize(&ints(&[1, 0, 0, 1, 0, 0, 0, 1, 0, 0]));
        assert_eq!(s.total, 10);
        assert_eq!(s.fraud_count, 3);
        assert_eq!(s.legit_count, 7);
        assert!((s.fraud_rate_percent - 30.0).abs() < 1e-9);
        assert!((s.legit_rate_percent() - 70.0).abs() < 1e-9);
        assert_eq!(s.non_binary, 0);
    }

    #[test]
    fn summary_of_empty_table_has_zero_rate() {
        let s = summarize(&ints(&[]));
        assert_eq!(s.total, 0);
        assert_eq!(s.fraud_rate_percent, 0.0);
        assert_eq!(s.legit_rate_percent(), 0.0);
    }

    #[test]
    fn summary_treats_float_labels_like_ints() {
        let t = table(&[
            (1, CellValue::Float(1.0)),
            (2, CellValue::Integer(1)),
            (3, CellValue::Float(0.0)),
            (4, CellValue::Integer(0)),
            (5, CellValue::Integer(2)),
            (6, CellValue::Null),
        ]);
        let s = summarize(&t);
        assert_eq!(s.fraud_count, 2);
        assert_eq!(s.legit_count, 4);
        assert_eq!(s.non_binary, 2);
    }

    #[test]
    fn lookup_fraudulent_and_legitimate() {
        let t = table(&[
            (3663549, CellValue::Integer(1)),
            (3663550, CellValue::Integer(0)),
        ]);
        assert_eq!(lookup(&t, "3663549"), Ok(LookupOutcome::Fraudulent { row: 0 }));
        assert_eq!(lookup(&t, "3663550"), Ok(LookupOutcome::Legitimate { row: 1 }));
        assert_eq!(lookup(&t, " 3663550 "), Ok(LookupOutcome::Legitimate { row: 1 }));
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let t = ints(&[1, 0]);
        assert_eq!(lookup(&t, "999999999"), Ok(LookupOutcome::NotFound));
        assert_eq!(lookup(&ints(&[]), "1"), Ok(LookupOutcome::NotFound));
    }

    #[test]
    fn lookup_rejects_bad_input() {
        let t = ints(&[1]);
        assert_eq!(lookup(&t, "abc"), Err(LookupError::InvalidId("abc".into())));
        assert_eq!(lookup(&t, "12.5"), Err(LookupError::InvalidId("12.5".into())));
        assert_eq!(lookup(&t, ""), Err(LookupError::EmptyInput));
        assert_eq!(lookup(&t, "   "), Err(LookupError::EmptyInput));
    }

    #[test]
    fn lookup_first_duplicate_wins() {
        let t = table(&[(7, CellValue::Integer(0)), (7, CellValue::Integer(1))]);
        assert_eq!(lookup(&t, "7"), Ok(LookupOutcome::Legitimate { row: 0 }));
    }

    #[test]
    fn lookup_matches_float_ids() {
        let records = vec![PredictionRecord::new(vec![
            CellValue::Float(42.0),
            CellValue::Float(1.0),
        ])];
        let t = PredictionTable::new(vec!["TransactionID".into(), "prediction".into()], records)
            .unwrap();
        assert_eq!(lookup(&t, "42"), Ok(LookupOutcome::Fraudulent { row: 0 }));
    }

    #[test]
    fn sample_is_deterministic_and_ordered() {
        let t = ints(&[0, 1, 0, 1, 1, 0]);
        let first = sample_label(&t, Label::Fraudulent, 2);
        let second = sample_label(&t, Label::Fraudulent, 2);
        assert_eq!(first, second);
        assert_eq!(
            quick_test_ids(&t, Label::Fraudulent, 2),
            vec![CellValue::Integer(2), CellValue::Integer(4)]
        );
        assert_eq!(
            quick_test_ids(&t, Label::Legitimate, 2),
            vec![CellValue::Integer(1), CellValue::Integer(3)]
        );
    }

    #[test]
    fn sample_under_fills_without_padding() {
        let t = ints(&[0, 0, 1, 0]);
        assert_eq!(sample_label(&t, Label::Fraudulent, 10).len(), 1);
        assert!(sample_label(&ints(&[0, 0]), Label::Fraudulent, 10).is_empty());
    }

    #[test]
    fn sample_accepts_custom_predicates() {
        let t = ints(&[0, 1, 0, 1]);
        let even_ids = sample(&t, |t, r| t.id_of(r).as_f64().is_some_and(|v| v % 2.0 == 0.0), 10);
        assert_eq!(even_ids.len(), 2);
    }
}
