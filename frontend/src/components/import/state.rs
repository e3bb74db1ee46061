use std::collections::{HashMap, HashSet};

use common::import::dedup::{duplicate_keys, normalize_number};
use common::import::row::ImportRow;
use yew::NodeRef;

/// State of the bulk-import dialog.
///
/// `rows` is the editable batch; `files` maps a row id to its source
/// document so phase-two attachment uploads can find it after creation.
pub struct ImportComponent {
    pub rows: Vec<ImportRow>,
    pub files: HashMap<String, web_sys::File>,
    pub skip_duplicates: bool,
    /// When set, extraction results overwrite fields the user already
    /// filled instead of only filling empty ones.
    pub overwrite_extracted: bool,
    pub defaults_date: String,
    pub defaults_deadline: String,
    pub defaults_type: String,
    pub submitting: bool,
    pub file_input_ref: NodeRef,
}

impl ImportComponent {
    pub fn new() -> Self {
        Self {
            rows: vec![ImportRow::empty(uuid::Uuid::new_v4().to_string())],
            files: HashMap::new(),
            skip_duplicates: false,
            overwrite_extracted: false,
            defaults_date: String::new(),
            defaults_deadline: String::new(),
            defaults_type: String::new(),
            submitting: false,
            file_input_ref: NodeRef::default(),
        }
    }

    /// Normalized business keys currently colliding between rows; the
    /// view flags these for correction before submission.
    pub fn duplicate_set(&self) -> HashSet<String> {
        duplicate_keys(self.rows.iter().map(|r| r.number.as_str()))
            .into_iter()
            .collect()
    }

    pub fn is_duplicate(&self, row: &ImportRow) -> bool {
        self.duplicate_set().contains(&normalize_number(&row.number))
    }
}
