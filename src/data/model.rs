use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the prediction table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Infer a typed value from raw cell text.
    pub fn infer(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Numeric view of the cell. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Whether this cell equals the integer `id` under numeric comparison.
    pub fn matches_id(&self, id: i64) -> bool {
        match self {
            CellValue::Integer(i) => *i == id,
            CellValue::Float(f) => *f == id as f64,
            _ => false,
        }
    }

    /// A prediction is fraud exactly when it equals 1 (or 1.0).
    pub fn is_fraud_label(&self) -> bool {
        self.as_f64() == Some(1.0)
    }

    /// Neither 0 nor 1. Such values are still treated as legitimate.
    pub fn is_non_binary_label(&self) -> bool {
        !matches!(self.as_f64(), Some(v) if v == 0.0 || v == 1.0)
    }
}

// ---------------------------------------------------------------------------
// PredictionRecord – one row of the table
// ---------------------------------------------------------------------------

/// One row, aligned with [`PredictionTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub values: Vec<CellValue>,
}

impl PredictionRecord {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    /// Cell at column index `idx`; missing cells read as null.
    pub fn get(&self, idx: usize) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.values.get(idx).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// PredictionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table with its resolved identifier and prediction columns.
///
/// Column roles are fixed at construction; the table is never mutated after
/// loading.
#[derive(Debug, Clone)]
pub struct PredictionTable {
    records: Vec<PredictionRecord>,
    columns: Vec<String>,
    id_column: usize,
    prediction_column: usize,
}

impl PredictionTable {
    /// Trim column names and resolve the column roles.
    ///
    /// Returns `None` when there are no columns at all.
    pub fn new(columns: Vec<String>, records: Vec<PredictionRecord>) -> Option<Self> {
        if columns.is_empty() {
            return None;
        }
        let columns: Vec<String> = columns.iter().map(|c| c.trim().to_string()).collect();

        let prediction_column =
            find_column(&columns, "prediction").unwrap_or(columns.len() - 1);
        let id_column = find_column(&columns, "transaction").unwrap_or(0);

        Some(Self {
            records,
            columns,
            id_column,
            prediction_column,
        })
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn id_column_name(&self) -> &str {
        &self.columns[self.id_column]
    }

    pub fn prediction_column_name(&self) -> &str {
        &self.columns[self.prediction_column]
    }

    pub fn id_of<'a>(&self, record: &'a PredictionRecord) -> &'a CellValue {
        record.get(self.id_column)
    }

    pub fn prediction_of<'a>(&self, record: &'a PredictionRecord) -> &'a CellValue {
        record.get(self.prediction_column)
    }

    pub fn is_fraud(&self, record: &PredictionRecord) -> bool {
        self.prediction_of(record).is_fraud_label()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// First column (in file order) whose lowercased name contains `needle`.
fn find_column(columns: &[String], needle: &str) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_named_columns() {
        let table =
            PredictionTable::new(cols(&["TransactionID", "isFraud_prediction", "amt"]), vec![])
                .unwrap();
        assert_eq!(table.id_column_name(), "TransactionID");
        assert_eq!(table.prediction_column_name(), "isFraud_prediction");
    }

    #[test]
    fn falls_back_to_first_and_last_columns() {
        let table = PredictionTable::new(cols(&["a", "b", "c"]), vec![]).unwrap();
        assert_eq!(table.id_column_name(), "a");
        assert_eq!(table.prediction_column_name(), "c");
    }

    #[test]
    fn first_match_wins_and_names_are_trimmed() {
        let table = PredictionTable::new(
            cols(&["  amt ", " TRANSACTION_id", "prediction_v1 ", "transaction_dt", "Prediction"]),
            vec![],
        )
        .unwrap();
        assert_eq!(table.columns()[0], "amt");
        assert_eq!(table.id_column_name(), "TRANSACTION_id");
        assert_eq!(table.prediction_column_name(), "prediction_v1");
    }

    #[test]
    fn single_column_plays_both_roles() {
        let table = PredictionTable::new(cols(&["x"]), vec![]).unwrap();
        assert_eq!(table.id_column_name(), "x");
        assert_eq!(table.prediction_column_name(), "x");
    }

    #[test]
    fn no_columns_is_rejected() {
        assert!(PredictionTable::new(vec![], vec![]).is_none());
    }

    #[test]
    fn integer_and_float_labels_classify_alike() {
        assert!(CellValue::Integer(1).is_fraud_label());
        assert!(CellValue::Float(1.0).is_fraud_label());
        assert!(!CellValue::Integer(0).is_fraud_label());
        assert!(!CellValue::Float(0.0).is_fraud_label());
        assert!(!CellValue::Float(0.97).is_fraud_label());
        assert!(CellValue::Bool(true).is_fraud_label());
        assert!(!CellValue::Bool(false).is_fraud_label());
        assert!(!CellValue::String("1.0x".into()).is_fraud_label());
        assert!(!CellValue::Null.is_fraud_label());
    }

    #[test]
    fn non_binary_labels_are_flagged() {
        assert!(!CellValue::Integer(0).is_non_binary_label());
        assert!(!CellValue::Float(1.0).is_non_binary_label());
        assert!(CellValue::Integer(2).is_non_binary_label());
        assert!(CellValue::Null.is_non_binary_label());
        assert!(CellValue::String("yes".into()).is_non_binary_label());
    }

    #[test]
    fn infers_cell_types() {
        assert_eq!(CellValue::infer(""), CellValue::Null);
        assert_eq!(CellValue::infer(" 42 "), CellValue::Integer(42));
        assert_eq!(CellValue::infer("1.0"), CellValue::Float(1.0));
        assert_eq!(CellValue::infer("True"), CellValue::Bool(true));
        assert_eq!(CellValue::infer("W"), CellValue::String("W".into()));
    }

    #[test]
    fn ids_match_numerically() {
        assert!(CellValue::Integer(3663549).matches_id(3663549));
        assert!(CellValue::Float(3663549.0).matches_id(3663549));
        assert!(!CellValue::String("3663549".into()).matches_id(3663549));
    }
}
