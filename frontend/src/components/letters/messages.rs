use common::listing::filter::{QuickFilter, SortField};
use common::listing::sequence::RequestToken;
use common::model::letter::{Letter, LetterStatus};
use common::model::saved_view::ViewMode;
use common::model::user::User;
use common::requests::{BulkAction, LettersResponse};

use super::state::LoadOptions;

pub enum Msg {
    // Search + suggestions
    SearchInput(String),
    SearchDebounced(RequestToken),
    SuggestDebounced(RequestToken),
    SuggestionsLoaded(RequestToken, Vec<String>),
    ApplySuggestion(String),

    // Filter dimensions
    SetStatusFilter(Option<LetterStatus>),
    SetQuickFilter(Option<QuickFilter>),
    SetOwnerFilter(Option<String>),
    SetTypeFilter(Option<String>),
    SetPage(u32),
    SetLimit(u32),
    ToggleSort(SortField),

    // Load cycle
    Load(LoadOptions),
    Loaded(RequestToken, LettersResponse),
    LoadFailed(RequestToken, String),

    // Out-of-band invalidation
    VisibilityRegained,
    HistoryNavigated,

    // Presentation + persistence
    SetViewMode(ViewMode),
    SaveCurrentView,
    ApplyView(String),
    DeleteView(String),

    // Inline edits + bulk actions
    UsersLoaded(Vec<User>),
    ToggleSelect(String),
    ToggleSelectAll,
    PatchField {
        id: String,
        field: &'static str,
        value: serde_json::Value,
    },
    Patched(Letter),
    ActionFailed(String),
    RunBulkAction(BulkAction, Option<String>),
    BulkActionDone(u32),

    // Import dialog
    OpenImport,
    ImportCreated,
    ImportClosed,
}
