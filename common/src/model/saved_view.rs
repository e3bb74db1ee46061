use serde::{Deserialize, Serialize};

use crate::listing::filter::FilterState;

/// How the letters list is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl ViewMode {
    pub fn as_key(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Cards => "cards",
        }
    }

    pub fn from_key(key: &str) -> Option<ViewMode> {
        match key {
            "table" => Some(ViewMode::Table),
            "cards" => Some(ViewMode::Cards),
            _ => None,
        }
    }
}

/// A user-named snapshot of all filter dimensions plus view mode.
///
/// Saved views live only in browser local storage; they are created by an
/// explicit user action and removed by explicit deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: String,
    pub name: String,
    pub filters: FilterState,
    pub view_mode: ViewMode,
}
