//! # Attachment Upload Service
//!
//! `POST /api/upload` stores a source document for an existing letter.
//! Files land content-addressed under `uploads/` (named by the md5 of the
//! uploaded bytes, so re-uploads are idempotent on disk) and an
//! attachment row links them to the letter.

use actix_multipart::Multipart;
use actix_web::web::{post, scope};
use actix_web::{HttpResponse, Responder, Scope};
use chrono::Utc;
use common::requests::UploadResponse;
use futures_util::StreamExt;
use md5::Context;
use rusqlite::params;
use std::fs;
use std::path::Path;

use crate::db;

const API_PATH: &str = "/api/upload";
const UPLOAD_DIR: &str = "uploads";
const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(process))
}

pub async fn process(payload: Multipart) -> impl Responder {
    match store_attachment(payload).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Reads the `letterId` and `file` fields, verifies the letter exists,
/// writes the bytes, and records the attachment.
async fn store_attachment(
    mut payload: Multipart,
) -> Result<UploadResponse, Box<dyn std::error::Error>> {
    let mut letter_id: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = String::new();
    let mut md5_hasher = Context::new();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("letterId") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                }
                letter_id = Some(String::from_utf8(bytes)?.trim().to_string());
            }
            Some("file") => {
                filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();

                let mut bytes: Vec<u8> = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                        return Err("File too large".into());
                    }
                    md5_hasher.consume(&chunk);
                    bytes.extend_from_slice(&chunk);
                }
                file_bytes = Some(bytes);
            }
            _ => {}
        }
    }

    let letter_id = letter_id.ok_or("Missing letterId")?;
    let bytes = file_bytes.ok_or("Missing file")?;
    if letter_id.is_empty() {
        return Err("Missing letterId".into());
    }

    let conn = db::open()?;
    let known: bool = conn
        .prepare("SELECT 1 FROM letters WHERE id = ?1")?
        .exists(params![letter_id])?;
    if !known {
        return Err("Letter not found".into());
    }

    let md5_hex = format!("{:x}", md5_hasher.finalize());
    let extension = Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    fs::create_dir_all(UPLOAD_DIR)?;
    let stored_path = format!("{}/{}.{}", UPLOAD_DIR, md5_hex, extension);
    if !Path::new(&stored_path).exists() {
        fs::write(&stored_path, &bytes)?;
    }

    let attachment_id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO attachments (id, letter_id, filename, md5, size, uploaded_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            attachment_id,
            letter_id,
            filename,
            md5_hex,
            bytes.len() as i64,
            Utc::now().to_rfc3339(),
        ],
    )?;

    Ok(UploadResponse {
        attachment_id,
        md5: md5_hex,
        size: bytes.len() as u64,
    })
}
