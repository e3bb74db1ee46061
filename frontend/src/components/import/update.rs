//! Update function for the bulk-import dialog.
//!
//! Extraction runs one request per row, each in its own `spawn_local`,
//! so one file's failure never aborts the others; every completion
//! message touches only its own row, and a row leaves the `parsing`
//! state exactly once. Submission is two-phase: one batch-create call,
//! then per-row attachment uploads matched by the echoed client row id.

use common::import::dedup::{duplicate_keys, normalize_number};
use common::import::merge::{apply_defaults, merge_extracted, ImportDefaults};
use common::import::row::{any_parsing, recognition_counts, ImportRow};
use common::requests::{BulkCreateRequest, BulkLetterInput};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;

use super::helpers;
use super::messages::{Msg, RowField};
use super::state::ImportComponent;

pub fn update(component: &mut ImportComponent, ctx: &Context<ImportComponent>, msg: Msg) -> bool {
    match msg {
        Msg::OpenFileDialog => {
            if let Some(input) = component
                .file_input_ref
                .cast::<web_sys::HtmlInputElement>()
            {
                input.click();
            }
            false
        }

        Msg::FilesPicked(files) => {
            let (pdfs, rejected) = helpers::accept_pdfs(files);
            if rejected > 0 {
                show_toast(&format!("Only PDF files are accepted; {} skipped", rejected));
            }
            if pdfs.is_empty() {
                return false;
            }

            // A single untouched default row is replaced, not kept.
            if component.rows.len() == 1 && component.rows[0].is_blank() {
                component.rows.clear();
            }

            for file in pdfs {
                let row_id = uuid::Uuid::new_v4().to_string();
                component
                    .rows
                    .push(ImportRow::for_file(row_id.clone(), file.name()));
                component.files.insert(row_id.clone(), file.clone());

                // One extraction request per row; failures stay per-row.
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = helpers::post_parse_pdf(&file).await;
                    link.send_message(Msg::ExtractFinished { row_id, result });
                });
            }
            true
        }

        Msg::ExtractFinished { row_id, result } => {
            let overwrite = component.overwrite_extracted;
            let Some(row) = component.rows.iter_mut().find(|r| r.id == row_id) else {
                // Row was removed while its extraction was in flight.
                return false;
            };
            if !row.parsing {
                return false;
            }
            row.parsing = false;
            match result {
                Ok(extracted) => {
                    merge_extracted(row, &extracted, overwrite);
                    row.parsed_by_ai = true;
                }
                Err(error) => {
                    row.error = Some(error);
                }
            }

            if !any_parsing(&component.rows) {
                let (recognized, total) = recognition_counts(&component.rows);
                if total > 0 {
                    show_toast(&format!("{} of {} recognized", recognized, total));
                }
            }
            true
        }

        Msg::EditField {
            row_id,
            field,
            value,
        } => {
            let Some(row) = component.rows.iter_mut().find(|r| r.id == row_id) else {
                return false;
            };
            match field {
                RowField::Number => row.number = value,
                RowField::Organization => row.organization = value,
                RowField::ReceivedDate => {
                    row.received_date = helpers::parse_date_input(&value)
                }
                RowField::Deadline => row.deadline = helpers::parse_date_input(&value),
                RowField::Type => row.letter_type = value,
                RowField::Priority => row.priority = value.parse().unwrap_or(0),
                RowField::Content => row.content = value,
            }
            row.error = None;
            true
        }

        Msg::AddRow => {
            component
                .rows
                .push(ImportRow::empty(uuid::Uuid::new_v4().to_string()));
            true
        }
        Msg::RemoveRow(row_id) => {
            component.rows.retain(|r| r.id != row_id);
            component.files.remove(&row_id);
            true
        }

        Msg::SetSkipDuplicates(value) => {
            component.skip_duplicates = value;
            true
        }
        Msg::SetOverwrite(value) => {
            component.overwrite_extracted = value;
            true
        }
        Msg::SetDefaultDate(value) => {
            component.defaults_date = value;
            true
        }
        Msg::SetDefaultDeadline(value) => {
            component.defaults_deadline = value;
            true
        }
        Msg::SetDefaultType(value) => {
            component.defaults_type = value;
            true
        }
        Msg::ApplyDefaults { only_empty } => {
            let defaults = ImportDefaults {
                received_date: helpers::parse_date_input(&component.defaults_date),
                deadline: helpers::parse_date_input(&component.defaults_deadline),
                letter_type: Some(component.defaults_type.trim().to_string())
                    .filter(|t| !t.is_empty()),
            };
            apply_defaults(&mut component.rows, &defaults, only_empty);
            true
        }

        Msg::Submit => {
            if any_parsing(&component.rows) {
                show_toast("Extraction is still running");
                return false;
            }
            if !component.rows.iter().any(|r| !r.is_blank()) {
                show_toast("Nothing to import");
                return false;
            }
            let missing_number = component
                .rows
                .iter()
                .any(|r| !r.is_blank() && normalize_number(&r.number).is_empty());
            if missing_number {
                mark_rows(component, |row| normalize_number(&row.number).is_empty(),
                    "Letter number is required");
                show_toast("Every row needs a letter number");
                return true;
            }
            let duplicates = duplicate_keys(
                component
                    .rows
                    .iter()
                    .filter(|r| !r.is_blank())
                    .map(|r| r.number.as_str()),
            );
            if !duplicates.is_empty() {
                let set: std::collections::HashSet<String> = duplicates.iter().cloned().collect();
                mark_rows(component, |row| set.contains(&normalize_number(&row.number)),
                    "Duplicate number");
                show_toast(&format!("Duplicate numbers: {}", duplicates.join(", ")));
                return true;
            }

            let request = BulkCreateRequest {
                letters: component
                    .rows
                    .iter()
                    .filter(|r| !r.is_blank())
                    .map(|row| BulkLetterInput {
                        client_row_id: row.id.clone(),
                        number: row.number.clone(),
                        organization: row.organization.clone(),
                        received_date: row.received_date,
                        deadline: row.deadline,
                        letter_type: Some(row.letter_type.clone()).filter(|t| !t.is_empty()),
                        priority: row.priority,
                        content: row.content.clone(),
                    })
                    .collect(),
                skip_duplicates: component.skip_duplicates,
            };

            component.submitting = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match helpers::post_bulk(&request).await {
                    Ok(response) => link.send_message(Msg::SubmitSucceeded(response)),
                    Err((message, duplicates)) => link.send_message(Msg::SubmitRejected {
                        message,
                        duplicates,
                    }),
                }
            });
            true
        }

        Msg::SubmitSucceeded(response) => {
            show_toast(&format!(
                "Created {}, skipped {}",
                response.created, response.skipped
            ));
            ctx.props().on_created.emit(());

            // Consume the created rows; keep skipped ones for correction.
            let created_row_ids: Vec<String> = response
                .letters
                .iter()
                .filter_map(|c| c.client_row_id.clone())
                .collect();
            component.rows.retain(|r| !created_row_ids.contains(&r.id));
            if let Some(skipped) = &response.duplicates {
                let skipped: std::collections::HashSet<String> = skipped.iter().cloned().collect();
                for row in component.rows.iter_mut() {
                    if skipped.contains(&normalize_number(&row.number)) {
                        row.error = Some("Skipped: a letter with this number already exists".into());
                    }
                }
            }

            // Phase two: upload the source documents, matched by the
            // echoed client row id (the server is authoritative for
            // letter identity).
            let mut uploads: Vec<(web_sys::File, String)> = Vec::new();
            for created in &response.letters {
                if let Some(row_id) = &created.client_row_id {
                    if let Some(file) = component.files.remove(row_id) {
                        uploads.push((file, created.letter.id.clone()));
                    }
                }
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                let mut uploaded = 0;
                let mut failed = 0;
                for (file, letter_id) in uploads {
                    match helpers::upload_attachment(&file, &letter_id).await {
                        Ok(()) => uploaded += 1,
                        Err(_) => failed += 1,
                    }
                }
                link.send_message(Msg::AttachmentsUploaded { uploaded, failed });
            });
            true
        }

        Msg::SubmitRejected {
            message,
            duplicates,
        } => {
            component.submitting = false;
            if !duplicates.is_empty() {
                let set: std::collections::HashSet<String> = duplicates.into_iter().collect();
                mark_rows(component, |row| set.contains(&normalize_number(&row.number)),
                    "Duplicate number");
            }
            show_toast(&message);
            true
        }

        Msg::AttachmentsUploaded { uploaded, failed } => {
            component.submitting = false;
            if failed > 0 {
                // Letters exist either way; attachment failure is
                // reported separately.
                show_toast(&format!(
                    "{} attachment(s) failed to upload; the letters were still created",
                    failed
                ));
            } else if uploaded > 0 {
                show_toast(&format!("{} attachment(s) uploaded", uploaded));
            }
            if component.rows.is_empty() {
                ctx.props().on_close.emit(());
            }
            true
        }

        Msg::Cancel => {
            ctx.props().on_close.emit(());
            false
        }
    }
}

fn mark_rows<F: Fn(&ImportRow) -> bool>(
    component: &mut ImportComponent,
    predicate: F,
    message: &str,
) {
    for row in component.rows.iter_mut() {
        if !row.is_blank() && predicate(row) {
            row.error = Some(message.to_string());
        }
    }
}
