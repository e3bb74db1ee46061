use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deadline::infer_deadline;
use super::row::ImportRow;

/// Candidate field values returned by the extraction service for one
/// uploaded document. Every field is optional; absent fields leave the
/// row untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLetter {
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub organization: Option<String>,
    pub content: Option<String>,
}

/// Merges extraction results into a row under a declared precedence rule:
/// extracted values fill empty targets only, unless `overwrite` is set, in
/// which case present extracted values replace row values. The deadline
/// goes through the inference policy, and a recommended category is
/// applied only while the row's type is still empty — never overwritten.
pub fn merge_extracted(row: &mut ImportRow, extracted: &ExtractedLetter, overwrite: bool) {
    if let Some(number) = &extracted.number {
        if row.number.is_empty() || overwrite {
            row.number = number.clone();
        }
    }
    if let Some(organization) = &extracted.organization {
        if row.organization.is_empty() || overwrite {
            row.organization = organization.clone();
        }
    }
    if let Some(content) = &extracted.content {
        if row.content.is_empty() || overwrite {
            row.content = content.clone();
        }
    }
    if extracted.date.is_some() && (row.received_date.is_none() || overwrite) {
        row.received_date = extracted.date;
    }
    if row.deadline.is_none() || overwrite {
        if let Some(deadline) = infer_deadline(extracted.deadline, extracted.date) {
            row.deadline = Some(deadline);
        }
    }
    if row.letter_type.is_empty() {
        if let Some(category) = recommend_category(
            extracted.content.as_deref().unwrap_or(""),
            extracted.organization.as_deref().unwrap_or(""),
            row.file_name.as_deref().unwrap_or(""),
        ) {
            row.letter_type = category.to_string();
        }
    }
}

/// Keyword rules mapping extracted content, organization, and filename to
/// a recommended category. Content keywords are checked first, then the
/// filename, then the organization; the first rule that fires wins.
pub fn recommend_category(content: &str, organization: &str, file_name: &str) -> Option<&'static str> {
    const TEXT_RULES: [(&[&str], &str); 5] = [
        (&["invoice", "payment", "billing"], "Finance"),
        (&["complaint", "grievance"], "Complaint"),
        (&["contract", "agreement"], "Contract"),
        (&["request", "application", "inquiry"], "Request"),
        (&["notice", "notification", "reminder"], "Notice"),
    ];
    const ORG_RULES: [(&[&str], &str); 1] = [(
        &["ministry", "department", "agency", "municipal", "council"],
        "Official",
    )];

    let content = content.to_lowercase();
    let file_name = file_name.to_lowercase();
    let organization = organization.to_lowercase();

    for haystack in [&content, &file_name] {
        for (keywords, category) in TEXT_RULES {
            if keywords.iter().any(|k| haystack.contains(k)) {
                return Some(category);
            }
        }
    }
    for (keywords, category) in ORG_RULES {
        if keywords.iter().any(|k| organization.contains(k)) {
            return Some(category);
        }
    }
    None
}

/// Side-panel defaults applied across rows. When only a date is supplied
/// the deadline follows the same inference policy as extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportDefaults {
    pub received_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub letter_type: Option<String>,
}

/// Applies defaults to every row that is not mid-extraction. With
/// `only_empty` set, a default lands only where the target field is still
/// blank; otherwise it overwrites.
pub fn apply_defaults(rows: &mut [ImportRow], defaults: &ImportDefaults, only_empty: bool) {
    let inferred_deadline = infer_deadline(defaults.deadline, defaults.received_date);
    for row in rows.iter_mut() {
        if row.parsing {
            continue;
        }
        if let Some(date) = defaults.received_date {
            if row.received_date.is_none() || !only_empty {
                row.received_date = Some(date);
            }
        }
        if let Some(deadline) = inferred_deadline {
            if row.deadline.is_none() || !only_empty {
                row.deadline = Some(deadline);
            }
        }
        if let Some(letter_type) = &defaults.letter_type {
            if row.letter_type.is_empty() || !only_empty {
                row.letter_type = letter_type.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::row::ImportRow;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn extracted() -> ExtractedLetter {
        ExtractedLetter {
            number: Some("14/07".into()),
            date: Some(date("2024-01-10")),
            deadline: None,
            organization: Some("Harbor Authority".into()),
            content: Some("Please review the attached inspection report.".into()),
        }
    }

    #[test]
    fn fills_only_empty_targets_by_default() {
        let mut row = ImportRow::for_file("r1".into(), "scan.pdf".into());
        row.number = "MANUAL-1".into();

        merge_extracted(&mut row, &extracted(), false);

        assert_eq!(row.number, "MANUAL-1");
        assert_eq!(row.organization, "Harbor Authority");
        assert_eq!(row.received_date, Some(date("2024-01-10")));
        // No explicit deadline: inferred from the document date.
        assert_eq!(row.deadline, Some(date("2024-01-17")));
    }

    #[test]
    fn overwrite_flag_replaces_present_values() {
        let mut row = ImportRow::for_file("r1".into(), "scan.pdf".into());
        row.number = "MANUAL-1".into();
        row.organization = "Old Org".into();

        merge_extracted(&mut row, &extracted(), true);

        assert_eq!(row.number, "14/07");
        assert_eq!(row.organization, "Harbor Authority");
    }

    #[test]
    fn category_is_recommended_only_while_type_is_empty() {
        let mut row = ImportRow::for_file("r1".into(), "scan.pdf".into());
        let mut data = extracted();
        data.content = Some("Invoice for services rendered in December".into());

        merge_extracted(&mut row, &data, false);
        assert_eq!(row.letter_type, "Finance");

        let mut typed = ImportRow::for_file("r2".into(), "scan.pdf".into());
        typed.letter_type = "Archive".into();
        merge_extracted(&mut typed, &data, true);
        assert_eq!(typed.letter_type, "Archive");
    }

    #[test]
    fn category_falls_back_to_filename_then_organization() {
        assert_eq!(
            recommend_category("", "", "complaint_2024.pdf"),
            Some("Complaint")
        );
        assert_eq!(
            recommend_category("", "Ministry of Transport", ""),
            Some("Official")
        );
        assert_eq!(recommend_category("weekly digest", "Acme LLC", "scan.pdf"), None);
    }

    #[test]
    fn defaults_respect_only_empty_and_infer_deadline() {
        let mut rows = vec![
            ImportRow::empty("a".into()),
            ImportRow::empty("b".into()),
        ];
        rows[1].received_date = Some(date("2024-03-01"));
        rows[1].deadline = Some(date("2024-03-20"));

        let defaults = ImportDefaults {
            received_date: Some(date("2024-01-10")),
            deadline: None,
            letter_type: Some("Notice".into()),
        };

        apply_defaults(&mut rows, &defaults, true);
        assert_eq!(rows[0].received_date, Some(date("2024-01-10")));
        assert_eq!(rows[0].deadline, Some(date("2024-01-17")));
        assert_eq!(rows[0].letter_type, "Notice");
        // Row b already had values; only-empty leaves them alone.
        assert_eq!(rows[1].received_date, Some(date("2024-03-01")));
        assert_eq!(rows[1].deadline, Some(date("2024-03-20")));

        apply_defaults(&mut rows, &defaults, false);
        assert_eq!(rows[1].received_date, Some(date("2024-01-10")));
        assert_eq!(rows[1].deadline, Some(date("2024-01-17")));
    }

    #[test]
    fn parsing_rows_are_skipped_by_defaults() {
        let mut rows = vec![ImportRow::for_file("a".into(), "a.pdf".into())];
        let defaults = ImportDefaults {
            received_date: Some(date("2024-01-10")),
            ..ImportDefaults::default()
        };
        apply_defaults(&mut rows, &defaults, false);
        assert_eq!(rows[0].received_date, None);
    }
}
