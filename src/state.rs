use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::data::model::{CellValue, PredictionRecord, PredictionTable};
use crate::data::query::{self, Label, LookupError, LookupOutcome, Summary};

/// Ids offered as one-click quick tests, per label.
pub const QUICK_TEST_LIMIT: usize = 2;
/// Rows shown in each preview tab.
pub const PREVIEW_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Lookup widget state
// ---------------------------------------------------------------------------

/// Result of the last submitted lookup, already tied to the id typed in.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupView {
    Outcome { id: String, outcome: LookupOutcome },
    Error(LookupError),
}

/// Verdict shown after clicking a quick-test button.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickTestVerdict {
    pub id: CellValue,
    pub label: Label,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a file loads successfully).
    pub table: Option<Arc<PredictionTable>>,

    /// Path of the current (or last attempted) table.
    pub source_path: Option<PathBuf>,

    cache: TableCache,

    /// Text in the lookup box.
    pub lookup_input: String,

    pub lookup_view: Option<LookupView>,

    pub quick_test: Option<QuickTestVerdict>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Which preview tab is open.
    pub preview_tab: Label,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            source_path: None,
            cache: TableCache::new(),
            lookup_input: String::new(),
            lookup_view: None,
            quick_test: None,
            status_message: None,
            preview_tab: Label::Fraudulent,
        }
    }

    /// Load `path` through the cache.  On failure the previous table is
    /// dropped so nothing stale is rendered.
    pub fn open(&mut self, path: &Path) {
        self.source_path = Some(path.to_path_buf());
        self.lookup_view = None;
        self.quick_test = None;
        match self.cache.get_or_load(path) {
            Ok(table) => {
                self.table = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load predictions: {e}");
                self.table = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Forget the cached copy of the current file and load it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source_path.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        self.table.as_deref().map(query::summarize)
    }

    /// Run the lookup for the current input.  Errors stay in the widget.
    pub fn submit_lookup(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.lookup_view = Some(match query::lookup(table, &self.lookup_input) {
            Ok(outcome) => LookupView::Outcome {
                id: self.lookup_input.trim().to_string(),
                outcome,
            },
            Err(e) => LookupView::Error(e),
        });
    }

    /// Record the verdict for a quick-test id.
    pub fn quick_test(&mut self, id: CellValue, label: Label) {
        self.quick_test = Some(QuickTestVerdict { id, label });
    }

    pub fn quick_test_ids(&self, label: Label) -> Vec<CellValue> {
        self.table
            .as_deref()
            .map(|t| query::quick_test_ids(t, label, QUICK_TEST_LIMIT))
            .unwrap_or_default()
    }

    pub fn preview(&self, label: Label) -> Vec<&PredictionRecord> {
        self.table
            .as_deref()
            .map(|t| query::sample_label(t, label, PREVIEW_LIMIT))
            .unwrap_or_default()
    }

    /// Record matched by the last lookup, if any.
    pub fn matched_record(&self) -> Option<&PredictionRecord> {
        let table = self.table.as_deref()?;
        match self.lookup_view.as_ref()? {
            LookupView::Outcome {
                outcome: LookupOutcome::Fraudulent { row } | LookupOutcome::Legitimate { row },
                ..
            } => table.records().get(*row),
            _ => None,
        }
    }
}
