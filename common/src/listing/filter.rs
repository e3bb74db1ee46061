use serde::{Deserialize, Serialize};

use crate::model::letter::LetterStatus;

/// Page size used when the stored preference is absent or invalid.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Page sizes offered by the UI; the backend clamps to the largest.
pub const PAGE_SIZE_CHOICES: [u32; 4] = [10, 25, 50, 100];

/// Named, predefined filter shortcuts. All are derivable server-side
/// without a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    Overdue,
    DueToday,
    Unassigned,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 3] = [
        QuickFilter::Overdue,
        QuickFilter::DueToday,
        QuickFilter::Unassigned,
    ];

    pub fn as_key(&self) -> &'static str {
        match self {
            QuickFilter::Overdue => "overdue",
            QuickFilter::DueToday => "due-today",
            QuickFilter::Unassigned => "unassigned",
        }
    }

    pub fn from_key(key: &str) -> Option<QuickFilter> {
        QuickFilter::ALL.into_iter().find(|q| q.as_key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickFilter::Overdue => "Overdue",
            QuickFilter::DueToday => "Due today",
            QuickFilter::Unassigned => "Unassigned",
        }
    }
}

/// Columns the list can be sorted by. Wire keys are camelCase to match the
/// URL contract (`sortBy=receivedDate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    ReceivedDate,
    Deadline,
    Number,
    Organization,
    Priority,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::ReceivedDate,
        SortField::Deadline,
        SortField::Number,
        SortField::Organization,
        SortField::Priority,
        SortField::Status,
    ];

    pub fn as_key(&self) -> &'static str {
        match self {
            SortField::ReceivedDate => "receivedDate",
            SortField::Deadline => "deadline",
            SortField::Number => "number",
            SortField::Organization => "organization",
            SortField::Priority => "priority",
            SortField::Status => "status",
        }
    }

    pub fn from_key(key: &str) -> Option<SortField> {
        SortField::ALL.into_iter().find(|f| f.as_key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::ReceivedDate => "Received",
            SortField::Deadline => "Deadline",
            SortField::Number => "Number",
            SortField::Organization => "Organization",
            SortField::Priority => "Priority",
            SortField::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_key(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_key(key: &str) -> Option<SortOrder> {
        match key {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn flipped(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// The complete filter/sort/pagination state of the letters list.
///
/// Invariant: any mutation of a filter dimension resets `page` to 1. The
/// single exception is a sort-direction toggle on the already-active sort
/// field, which leaves the page alone. All setters below enforce this;
/// callers never assign fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub status: Option<LetterStatus>,
    pub quick: Option<QuickFilter>,
    pub owner: Option<String>,
    pub letter_type: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for FilterState {
    fn default() -> FilterState {
        FilterState {
            search: String::new(),
            status: None,
            quick: None,
            owner: None,
            letter_type: None,
            sort_by: SortField::ReceivedDate,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<LetterStatus>) {
        self.status = status;
        self.page = 1;
    }

    pub fn set_quick(&mut self, quick: Option<QuickFilter>) {
        self.quick = quick;
        self.page = 1;
    }

    pub fn set_owner(&mut self, owner: Option<String>) {
        self.owner = owner.filter(|o| !o.is_empty());
        self.page = 1;
    }

    pub fn set_letter_type(&mut self, letter_type: Option<String>) {
        self.letter_type = letter_type.filter(|t| !t.is_empty());
        self.page = 1;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.clamp(1, *PAGE_SIZE_CHOICES.last().unwrap_or(&100));
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Sorting by the active field flips the direction and keeps the page;
    /// sorting by a new field starts ascending on page 1.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Asc;
            self.page = 1;
        }
    }

    /// Serializes the state into its canonical query string: fixed parameter
    /// order, defaults omitted. The result keys the response cache and is
    /// what the browser URL is kept in sync with.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.limit != DEFAULT_PAGE_SIZE {
            pairs.push(("limit", self.limit.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_key().to_string()));
        }
        if let Some(quick) = self.quick {
            pairs.push(("filter", quick.as_key().to_string()));
        }
        if let Some(owner) = &self.owner {
            pairs.push(("owner", owner.clone()));
        }
        if let Some(letter_type) = &self.letter_type {
            pairs.push(("type", letter_type.clone()));
        }
        if self.sort_by != SortField::ReceivedDate {
            pairs.push(("sortBy", self.sort_by.as_key().to_string()));
        }
        if self.sort_order != SortOrder::Desc {
            pairs.push(("sortOrder", self.sort_order.as_key().to_string()));
        }
        if !self.search.trim().is_empty() {
            pairs.push(("search", self.search.trim().to_string()));
        }

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Restores state from a URL query string. Unknown keys and unparsable
    /// values are ignored, so stale bookmarks degrade to defaults.
    pub fn from_query_string(query: &str) -> FilterState {
        let mut state = FilterState::default();
        for pair in query.trim_start_matches('?').split('&') {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = decode_component(parts.next().unwrap_or(""));
            match key {
                "page" => {
                    if let Ok(page) = value.parse::<u32>() {
                        state.page = page.max(1);
                    }
                }
                "limit" => {
                    if let Ok(limit) = value.parse::<u32>() {
                        state.limit = limit.clamp(1, *PAGE_SIZE_CHOICES.last().unwrap_or(&100));
                    }
                }
                "status" => state.status = LetterStatus::from_key(&value),
                "filter" => state.quick = QuickFilter::from_key(&value),
                "owner" => {
                    if !value.is_empty() {
                        state.owner = Some(value);
                    }
                }
                "type" => {
                    if !value.is_empty() {
                        state.letter_type = Some(value);
                    }
                }
                "sortBy" => {
                    if let Some(field) = SortField::from_key(&value) {
                        state.sort_by = field;
                    }
                }
                "sortOrder" => {
                    if let Some(order) = SortOrder::from_key(&value) {
                        state.sort_order = order;
                    }
                }
                "search" => state.search = value,
                _ => {}
            }
        }
        state
    }
}

/// Percent-encodes everything outside the URL-unreserved set.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if let (Some(hi), Some(lo)) = (
                    bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                    bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
                ) {
                    out.push((hi * 16 + lo) as u8);
                    i += 3;
                    continue;
                }
                out.push(b'%');
                i += 1;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page_seven() -> FilterState {
        let mut state = FilterState::default();
        state.set_page(7);
        state
    }

    #[test]
    fn every_dimension_mutation_resets_page() {
        let mut s = on_page_seven();
        s.set_search("audit".into());
        assert_eq!(s.page, 1);

        let mut s = on_page_seven();
        s.set_status(Some(LetterStatus::Ready));
        assert_eq!(s.page, 1);

        let mut s = on_page_seven();
        s.set_quick(Some(QuickFilter::Overdue));
        assert_eq!(s.page, 1);

        let mut s = on_page_seven();
        s.set_owner(Some("u1".into()));
        assert_eq!(s.page, 1);

        let mut s = on_page_seven();
        s.set_letter_type(Some("Complaint".into()));
        assert_eq!(s.page, 1);

        let mut s = on_page_seven();
        s.set_limit(50);
        assert_eq!(s.page, 1);

        let mut s = on_page_seven();
        s.toggle_sort(SortField::Organization);
        assert_eq!(s.page, 1);
    }

    #[test]
    fn sort_direction_toggle_on_active_field_keeps_page() {
        let mut s = on_page_seven();
        let active = s.sort_by;
        let before = s.sort_order;
        s.toggle_sort(active);
        assert_eq!(s.page, 7);
        assert_eq!(s.sort_order, before.flipped());
    }

    #[test]
    fn default_state_serializes_to_empty_query() {
        assert_eq!(FilterState::default().to_query_string(), "");
    }

    #[test]
    fn query_string_is_canonical_and_round_trips() {
        let mut s = FilterState::default();
        s.set_status(Some(LetterStatus::InProgress));
        s.set_quick(Some(QuickFilter::Unassigned));
        s.set_letter_type(Some("Contract".into()));
        s.set_search("fire & safety".into());
        s.toggle_sort(SortField::Deadline);
        s.set_page(3);

        let query = s.to_query_string();
        assert_eq!(
            query,
            "page=3&status=in-progress&filter=unassigned&type=Contract&sortBy=deadline&sortOrder=asc&search=fire%20%26%20safety"
        );
        assert_eq!(FilterState::from_query_string(&query), s);
        assert_eq!(FilterState::from_query_string(&format!("?{}", query)), s);
    }

    #[test]
    fn unknown_keys_and_bad_values_are_ignored() {
        let s = FilterState::from_query_string("status=shredded&bogus=1&page=zero&sortBy=moon");
        assert_eq!(s, FilterState::default());
    }

    #[test]
    fn plus_decodes_as_space() {
        let s = FilterState::from_query_string("search=city+hall");
        assert_eq!(s.search, "city hall");
    }
}
