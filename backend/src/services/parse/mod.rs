//! # Document Extraction Service
//!
//! `POST /api/parse-pdf` accepts one uploaded PDF as multipart form data
//! and returns candidate letter fields recovered from it. The frontend's
//! bulk-import dialog calls this once per dropped file; a failure here
//! only affects that one row.

pub mod extract;

use actix_multipart::Multipart;
use actix_web::web::{post, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::requests::ParsePdfResponse;
use futures_util::StreamExt;

const API_PATH: &str = "/api/parse-pdf";

/// Uploaded documents larger than this are refused outright.
const MAX_DOCUMENT_BYTES: usize = 15 * 1024 * 1024;

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(process))
}

pub async fn process(payload: Multipart) -> impl Responder {
    match read_document(payload).await {
        Ok((bytes, filename)) => {
            let data = extract::extract_letter(&bytes, &filename);
            HttpResponse::Ok().json(ParsePdfResponse { data })
        }
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Pulls the single `file` field out of the multipart payload.
async fn read_document(
    mut payload: Multipart,
) -> Result<(Vec<u8>, String), Box<dyn std::error::Error>> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() == Some("file") {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                .unwrap_or_default();
            if !filename.to_lowercase().ends_with(".pdf") {
                return Err("The file must end with .pdf".into());
            }

            let mut bytes: Vec<u8> = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk?;
                if bytes.len() + chunk.len() > MAX_DOCUMENT_BYTES {
                    return Err("Document too large".into());
                }
                bytes.extend_from_slice(&chunk);
            }
            return Ok((bytes, filename));
        }
    }
    Err("Missing file".into())
}
