//! Heuristic field extraction from uploaded PDFs.
//!
//! Text recovery is deliberately simple: string literals are read from
//! uncompressed content streams (the `(...) Tj` operators), falling back
//! to printable ASCII runs for documents whose streams are compressed.
//! Field detection then runs regex heuristics over the recovered text.
//! Anything not found is left `None`; the client fills the gaps manually.

use chrono::NaiveDate;
use common::import::merge::ExtractedLetter;
use regex::Regex;

/// How much recovered text is returned as the letter content preview.
const CONTENT_PREVIEW_CHARS: usize = 500;

/// How far ahead of a date a deadline keyword may appear.
const DEADLINE_KEYWORD_WINDOW: usize = 48;

/// Extracts candidate letter fields from a document.
pub fn extract_letter(bytes: &[u8], filename: &str) -> ExtractedLetter {
    let text = extract_text(bytes);
    let (date, deadline) = detect_dates(&text);

    ExtractedLetter {
        number: detect_number(&text).or_else(|| number_from_filename(filename)),
        date,
        deadline,
        organization: detect_organization(&text),
        content: content_preview(&text),
    }
}

/// Recovers text from PDF string literals; falls back to printable runs.
fn extract_text(bytes: &[u8]) -> String {
    let literals = collect_string_literals(bytes);
    if !literals.trim().is_empty() {
        return literals;
    }
    collect_printable_runs(bytes)
}

/// Collects the contents of `(...)` string literals, honoring `\`
/// escapes and nested parentheses, joined with spaces. Literal `\n` in a
/// PDF string becomes a real line break so line-based heuristics work.
fn collect_string_literals(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    let mut escaped = false;
    for &byte in bytes {
        if depth == 0 {
            if byte == b'(' {
                depth = 1;
            }
            continue;
        }
        if escaped {
            match byte {
                b'n' | b'r' => out.push('\n'),
                b't' => out.push(' '),
                other if other.is_ascii_graphic() || other == b' ' => out.push(other as char),
                _ => {}
            }
            escaped = false;
            continue;
        }
        match byte {
            b'\\' => escaped = true,
            b'(' => {
                depth += 1;
                out.push('(');
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    out.push(' ');
                } else {
                    out.push(')');
                }
            }
            other if other.is_ascii_graphic() || other == b' ' => out.push(other as char),
            b'\n' | b'\r' => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Fallback for compressed documents: printable ASCII runs of at least
/// four characters, newline-separated.
fn collect_printable_runs(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut run = String::new();
    for &byte in bytes {
        if byte.is_ascii_graphic() || byte == b' ' {
            run.push(byte as char);
        } else {
            if run.trim().len() >= 4 {
                out.push_str(run.trim());
                out.push('\n');
            }
            run.clear();
        }
    }
    if run.trim().len() >= 4 {
        out.push_str(run.trim());
    }
    out
}

/// Reference numbers like `No. 123/45`, `Ref: AB-17`, `# 2024-118`.
fn detect_number(text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)\b(?:no|ref|reg)\s*[.:#]?\s*([A-Za-z0-9][A-Za-z0-9/\-]{0,19})")
        .ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|n| n.chars().any(|c| c.is_ascii_digit()))
}

/// `scan_118-2024.pdf` style filenames often carry the number.
fn number_from_filename(filename: &str) -> Option<String> {
    let stem = filename.rsplit('/').next()?.trim_end_matches(".pdf");
    let re = Regex::new(r"(\d[\d/\-]{1,14}\d)").ok()?;
    re.captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Finds the document date and, when a date is preceded by a deadline
/// keyword, the explicit deadline.
fn detect_dates(text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let re = match Regex::new(r"\b(?:(\d{1,2})[./](\d{1,2})[./](\d{4})|(\d{4})-(\d{2})-(\d{2}))\b")
    {
        Ok(re) => re,
        Err(_) => return (None, None),
    };
    let keyword = Regex::new(r"(?i)\b(?:due|deadline|reply by|respond by|until|latest)\b").ok();

    let mut document_date: Option<NaiveDate> = None;
    let mut deadline: Option<NaiveDate> = None;
    for caps in re.captures_iter(text) {
        let parsed = if caps.get(1).is_some() {
            build_date(&caps[3], &caps[2], &caps[1])
        } else {
            build_date(&caps[4], &caps[5], &caps[6])
        };
        let Some(date) = parsed else { continue };

        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let window_start = start.saturating_sub(DEADLINE_KEYWORD_WINDOW);
        let preceded_by_keyword = keyword
            .as_ref()
            .map(|k| k.is_match(clamp_str(text, window_start, start)))
            .unwrap_or(false);

        if preceded_by_keyword {
            if deadline.is_none() {
                deadline = Some(date);
            }
        } else if document_date.is_none() {
            document_date = Some(date);
        }
        if document_date.is_some() && deadline.is_some() {
            break;
        }
    }
    (document_date, deadline)
}

fn build_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
}

/// Slices on char boundaries even if the window lands mid-UTF-8.
fn clamp_str(text: &str, mut start: usize, end: usize) -> &str {
    while start < end && !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..end]
}

/// The sender organization is usually a heading: an early line of a few
/// words, mostly letters, not starting with a digit.
fn detect_organization(text: &str) -> Option<String> {
    for line in text.lines().take(12) {
        let line = line.trim();
        if line.len() < 4 || line.len() > 80 {
            continue;
        }
        if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            continue;
        }
        let words = line.split_whitespace().count();
        if words < 2 || words > 8 {
            continue;
        }
        let letters = line.chars().filter(|c| c.is_alphabetic()).count();
        if letters * 10 >= line.len() * 6 {
            return Some(line.to_string());
        }
    }
    None
}

fn content_preview(text: &str) -> Option<String> {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(CONTENT_PREVIEW_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_with(lines: &[&str]) -> Vec<u8> {
        let mut body = String::from("%PDF-1.4\n1 0 obj\nstream\nBT\n");
        for line in lines {
            body.push_str(&format!("({}) Tj\n", line));
        }
        body.push_str("ET\nendstream\nendobj\n%%EOF");
        body.into_bytes()
    }

    #[test]
    fn extracts_fields_from_uncompressed_stream() {
        let bytes = pdf_with(&[
            "Harbor Authority of Kronstadt\\n",
            "No. 118/24\\n",
            "Date: 12.03.2024\\n",
            "Please reply by 2024-03-25 at the latest.\\n",
            "We request an inspection of pier 4.",
        ]);
        let data = extract_letter(&bytes, "scan.pdf");

        assert_eq!(data.number.as_deref(), Some("118/24"));
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2024, 3, 12));
        assert_eq!(data.deadline, NaiveDate::from_ymd_opt(2024, 3, 25));
        assert_eq!(
            data.organization.as_deref(),
            Some("Harbor Authority of Kronstadt")
        );
        assert!(data.content.unwrap().contains("inspection of pier 4"));
    }

    #[test]
    fn date_without_keyword_is_document_date_only() {
        let bytes = pdf_with(&["Office of Records\\n", "Issued 05.02.2024\\n"]);
        let data = extract_letter(&bytes, "scan.pdf");
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2024, 2, 5));
        assert_eq!(data.deadline, None);
    }

    #[test]
    fn number_falls_back_to_filename() {
        let bytes = pdf_with(&["Office of Records\\n", "General correspondence."]);
        let data = extract_letter(&bytes, "incoming_204-2024.pdf");
        assert_eq!(data.number.as_deref(), Some("204-2024"));
    }

    #[test]
    fn empty_document_yields_nothing() {
        let data = extract_letter(b"", "blank.pdf");
        assert_eq!(data, ExtractedLetter::default());
    }

    #[test]
    fn invalid_calendar_dates_are_skipped() {
        let bytes = pdf_with(&["Office of Records\\n", "Dated 31.02.2024 and 14.03.2024"]);
        let data = extract_letter(&bytes, "scan.pdf");
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2024, 3, 14));
    }
}
