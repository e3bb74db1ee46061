use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a letter, from arrival to completion.
///
/// The wire representation (JSON and URL query values) is the kebab-case
/// key, e.g. `not-reviewed`, `in-progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LetterStatus {
    NotReviewed,
    Accepted,
    InProgress,
    Clarification,
    Ready,
    Done,
}

impl LetterStatus {
    /// Every status, in workflow order. Used to render select options and to
    /// validate PATCH values on the backend.
    pub const ALL: [LetterStatus; 6] = [
        LetterStatus::NotReviewed,
        LetterStatus::Accepted,
        LetterStatus::InProgress,
        LetterStatus::Clarification,
        LetterStatus::Ready,
        LetterStatus::Done,
    ];

    /// The kebab-case wire key.
    pub fn as_key(&self) -> &'static str {
        match self {
            LetterStatus::NotReviewed => "not-reviewed",
            LetterStatus::Accepted => "accepted",
            LetterStatus::InProgress => "in-progress",
            LetterStatus::Clarification => "clarification",
            LetterStatus::Ready => "ready",
            LetterStatus::Done => "done",
        }
    }

    /// Parses a wire key back into a status.
    pub fn from_key(key: &str) -> Option<LetterStatus> {
        LetterStatus::ALL.into_iter().find(|s| s.as_key() == key)
    }

    /// Human-readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            LetterStatus::NotReviewed => "Not reviewed",
            LetterStatus::Accepted => "Accepted",
            LetterStatus::InProgress => "In progress",
            LetterStatus::Clarification => "Clarification",
            LetterStatus::Ready => "Ready",
            LetterStatus::Done => "Done",
        }
    }
}

/// A tracked piece of organizational correspondence.
///
/// `number` is the human-assigned business key used for deduplication;
/// `id` is the system-generated identifier and is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: String,
    pub number: String,
    pub organization: String,
    pub received_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub status: LetterStatus,
    pub letter_type: Option<String>,
    pub owner: Option<String>,
    pub priority: i32,
    pub content: String,
    pub comment_count: u32,
    pub watcher_count: u32,
}

impl Letter {
    /// A letter is overdue when its deadline has passed and it is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.deadline {
            Some(deadline) => deadline < today && self.status != LetterStatus::Done,
            None => false,
        }
    }
}

/// Paging metadata returned alongside every letters listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Pagination {
        let limit = limit.max(1);
        let total_pages = ((total + u64::from(limit) - 1) / u64::from(limit)) as u32;
        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(deadline: Option<&str>, status: LetterStatus) -> Letter {
        Letter {
            id: "l1".into(),
            number: "001".into(),
            organization: "City Archive".into(),
            received_date: None,
            deadline: deadline.map(|d| d.parse().unwrap()),
            status,
            letter_type: None,
            owner: None,
            priority: 0,
            content: String::new(),
            comment_count: 0,
            watcher_count: 0,
        }
    }

    #[test]
    fn status_keys_round_trip() {
        for status in LetterStatus::ALL {
            assert_eq!(LetterStatus::from_key(status.as_key()), Some(status));
        }
        assert_eq!(LetterStatus::from_key("archived"), None);
    }

    #[test]
    fn status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&LetterStatus::NotReviewed).unwrap();
        assert_eq!(json, "\"not-reviewed\"");
        let back: LetterStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, LetterStatus::InProgress);
    }

    #[test]
    fn overdue_requires_past_deadline_and_open_status() {
        let today: NaiveDate = "2024-03-15".parse().unwrap();
        assert!(sample(Some("2024-03-14"), LetterStatus::InProgress).is_overdue(today));
        assert!(!sample(Some("2024-03-15"), LetterStatus::InProgress).is_overdue(today));
        assert!(!sample(Some("2024-03-01"), LetterStatus::Done).is_overdue(today));
        assert!(!sample(None, LetterStatus::InProgress).is_overdue(today));
    }

    #[test]
    fn pagination_rounds_up() {
        assert_eq!(Pagination::new(1, 25, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 25, 25).total_pages, 1);
        assert_eq!(Pagination::new(1, 25, 26).total_pages, 2);
    }
}
