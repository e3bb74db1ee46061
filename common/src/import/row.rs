use chrono::NaiveDate;

/// One editable row of the bulk-import dialog.
///
/// Rows are transient: created empty or from a dropped file, populated by
/// user input and/or extraction results, and discarded on successful batch
/// submission. While `parsing` is true the extraction request is in flight
/// and the row's inputs are locked.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// Client-side row id. The bulk-create response echoes it back so
    /// phase-two attachment uploads can be matched unambiguously.
    pub id: String,
    pub number: String,
    pub organization: String,
    pub received_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub letter_type: String,
    pub priority: i32,
    pub content: String,
    /// Original filename of the attached document, if any.
    pub file_name: Option<String>,
    /// Extraction in flight; transitions to false exactly once.
    pub parsing: bool,
    /// Extraction succeeded and auto-filled this row.
    pub parsed_by_ai: bool,
    /// Row-addressable error (failed extraction, duplicate number,
    /// server-side rejection).
    pub error: Option<String>,
}

impl ImportRow {
    pub fn empty(id: String) -> ImportRow {
        ImportRow {
            id,
            number: String::new(),
            organization: String::new(),
            received_date: None,
            deadline: None,
            letter_type: String::new(),
            priority: 0,
            content: String::new(),
            file_name: None,
            parsing: false,
            parsed_by_ai: false,
            error: None,
        }
    }

    /// A row created for a dropped file starts in the `parsing` state.
    pub fn for_file(id: String, file_name: String) -> ImportRow {
        ImportRow {
            file_name: Some(file_name),
            parsing: true,
            ..ImportRow::empty(id)
        }
    }

    /// True when the user has entered nothing and no file is attached.
    /// Such a default row is replaced, not kept, when files are ingested.
    pub fn is_blank(&self) -> bool {
        self.number.is_empty()
            && self.organization.is_empty()
            && self.received_date.is_none()
            && self.deadline.is_none()
            && self.letter_type.is_empty()
            && self.content.is_empty()
            && self.file_name.is_none()
    }
}

/// Counts extraction outcomes for the "N of M recognized" summary. Only
/// rows that had a file dispatched count toward the total.
pub fn recognition_counts(rows: &[ImportRow]) -> (usize, usize) {
    let dispatched: Vec<&ImportRow> = rows.iter().filter(|r| r.file_name.is_some()).collect();
    let recognized = dispatched.iter().filter(|r| r.parsed_by_ai).count();
    (recognized, dispatched.len())
}

/// True while any row still has an extraction in flight.
pub fn any_parsing(rows: &[ImportRow]) -> bool {
    rows.iter().any(|r| r.parsing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        let row = ImportRow::empty("r1".into());
        assert!(row.is_blank());

        let mut with_number = ImportRow::empty("r2".into());
        with_number.number = "12/A".into();
        assert!(!with_number.is_blank());

        let with_file = ImportRow::for_file("r3".into(), "scan.pdf".into());
        assert!(!with_file.is_blank());
    }

    #[test]
    fn recognition_counts_partial_failure() {
        // Extraction failed for file 2 of 3: summary must read 2 of 3.
        let mut rows = vec![
            ImportRow::for_file("a".into(), "a.pdf".into()),
            ImportRow::for_file("b".into(), "b.pdf".into()),
            ImportRow::for_file("c".into(), "c.pdf".into()),
            ImportRow::empty("manual".into()),
        ];
        for row in rows.iter_mut() {
            row.parsing = false;
        }
        rows[0].parsed_by_ai = true;
        rows[1].error = Some("extraction failed".into());
        rows[2].parsed_by_ai = true;

        assert_eq!(recognition_counts(&rows), (2, 3));
    }
}
