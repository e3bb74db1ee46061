//! HTTP plumbing for the import dialog: per-row extraction calls, the
//! batch-create call, and phase-two attachment uploads.

use chrono::NaiveDate;
use common::import::merge::ExtractedLetter;
use common::requests::{BulkCreateError, BulkCreateRequest, BulkCreateResponse, ParsePdfResponse};
use gloo_net::http::Request;

/// Sends one document to the extraction service.
pub async fn post_parse_pdf(file: &web_sys::File) -> Result<ExtractedLetter, String> {
    let form = web_sys::FormData::new().map_err(|_| "Could not build form data".to_string())?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| "Could not attach file".to_string())?;

    let response = Request::post("/api/parse-pdf")
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(response
            .text()
            .await
            .unwrap_or_else(|_| "Extraction failed".to_string()));
    }
    response
        .json::<ParsePdfResponse>()
        .await
        .map(|r| r.data)
        .map_err(|e| e.to_string())
}

/// Submits the batch. A rejection carries the server's message plus the
/// normalized duplicate numbers for row-level flagging.
pub async fn post_bulk(
    req: &BulkCreateRequest,
) -> Result<BulkCreateResponse, (String, Vec<String>)> {
    let response = Request::post("/api/letters/bulk")
        .json(req)
        .map_err(|e| (e.to_string(), Vec::new()))?
        .send()
        .await
        .map_err(|e| (e.to_string(), Vec::new()))?;

    if response.ok() {
        return response
            .json::<BulkCreateResponse>()
            .await
            .map_err(|e| (e.to_string(), Vec::new()));
    }

    // 409/422 bodies are structured; anything else is plain text.
    if let Ok(error) = response.json::<BulkCreateError>().await {
        Err((error.error, error.duplicates))
    } else {
        Err(("Batch creation failed".to_string(), Vec::new()))
    }
}

/// Uploads one source document for its created letter.
pub async fn upload_attachment(file: &web_sys::File, letter_id: &str) -> Result<(), String> {
    let form = web_sys::FormData::new().map_err(|_| "Could not build form data".to_string())?;
    form.append_with_str("letterId", letter_id)
        .map_err(|_| "Could not attach letter id".to_string())?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| "Could not attach file".to_string())?;

    let response = Request::post("/api/upload")
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(response
            .text()
            .await
            .unwrap_or_else(|_| "Upload failed".to_string()));
    }
    Ok(())
}

/// Splits a picked file list into accepted PDFs and a rejected count.
pub fn accept_pdfs(files: Vec<web_sys::File>) -> (Vec<web_sys::File>, usize) {
    let total = files.len();
    let pdfs: Vec<web_sys::File> = files
        .into_iter()
        .filter(|f| f.name().to_lowercase().ends_with(".pdf"))
        .collect();
    let rejected = total - pdfs.len();
    (pdfs, rejected)
}

pub fn file_list_to_vec(list: Option<web_sys::FileList>) -> Vec<web_sys::File> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

/// `<input type="date">` yields ISO dates or an empty string.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    value.parse().ok()
}
