//! # Public Portal Service
//!
//! `POST /api/portal/request` is the one unauthenticated endpoint:
//! an external applicant tracks a request by the letter number they were
//! given. The tracking contact is recorded and a read-only snapshot of
//! the letter comes back.

use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Responder, Scope};
use chrono::Utc;
use common::import::dedup::normalize_number;
use common::requests::{PortalRequest, PortalSnapshot};
use rusqlite::params;
use rusqlite::Connection;

use crate::db;

const API_PATH: &str = "/api/portal";

#[derive(Debug)]
pub enum PortalError {
    Validation(String),
    NotFound,
    Db(String),
}

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/request", post().to(process))
}

pub async fn process(body: web::Json<PortalRequest>) -> impl Responder {
    let result = db::open()
        .map_err(|e| PortalError::Db(e.to_string()))
        .and_then(|conn| track_request(&conn, &body));

    match result {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(PortalError::Validation(message)) => HttpResponse::UnprocessableEntity().body(message),
        Err(PortalError::NotFound) => {
            HttpResponse::NotFound().body("No request found for this number")
        }
        Err(PortalError::Db(e)) => {
            HttpResponse::ServiceUnavailable().body(format!("Error tracking request: {}", e))
        }
    }
}

/// Looks the letter up by its business key, records the tracking
/// contact, and returns the snapshot.
pub fn track_request(
    conn: &Connection,
    req: &PortalRequest,
) -> Result<PortalSnapshot, PortalError> {
    let key = normalize_number(&req.request_id);
    if key.is_empty() {
        return Err(PortalError::Validation("Request number must not be empty".into()));
    }
    if req.contact.trim().is_empty() {
        return Err(PortalError::Validation("Contact must not be empty".into()));
    }

    let letter = conn
        .query_row(
            &format!(
                "SELECT {} FROM letters WHERE LOWER(TRIM(number)) = ?1 LIMIT 1",
                db::LETTER_COLUMNS
            ),
            params![key],
            db::letter_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => PortalError::NotFound,
            other => PortalError::Db(other.to_string()),
        })?;

    conn.execute(
        "INSERT INTO portal_requests (id, number, contact, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            uuid::Uuid::new_v4().to_string(),
            letter.number,
            req.contact.trim(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| PortalError::Db(e.to_string()))?;

    Ok(PortalSnapshot {
        number: letter.number,
        organization: letter.organization,
        status: letter.status,
        received_date: letter.received_date,
        deadline: letter.deadline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::letter::LetterStatus;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO letters (id, number, organization, received_date, deadline, status, \
             letter_type, owner_id, priority, content, comment_count, watcher_count, created_at) \
             VALUES ('l1', '118/24', 'Harbor Authority', '2024-03-12', '2024-03-25', \
             'in-progress', NULL, NULL, 0, '', 0, 0, '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn
    }

    fn request(number: &str, contact: &str) -> PortalRequest {
        PortalRequest {
            request_id: number.to_string(),
            contact: contact.to_string(),
        }
    }

    #[test]
    fn known_number_returns_snapshot_and_records_contact() {
        let conn = test_conn();
        let snapshot = track_request(&conn, &request(" 118/24 ", "jo@example.org")).unwrap();

        assert_eq!(snapshot.number, "118/24");
        assert_eq!(snapshot.status, LetterStatus::InProgress);
        assert_eq!(snapshot.deadline, Some("2024-03-25".parse().unwrap()));

        let tracked: i64 = conn
            .query_row("SELECT COUNT(*) FROM portal_requests", [], |r| r.get(0))
            .unwrap();
        assert_eq!(tracked, 1);
    }

    #[test]
    fn unknown_number_is_not_found() {
        let conn = test_conn();
        assert!(matches!(
            track_request(&conn, &request("999/99", "jo@example.org")),
            Err(PortalError::NotFound)
        ));
    }

    #[test]
    fn blank_fields_are_validation_errors() {
        let conn = test_conn();
        assert!(matches!(
            track_request(&conn, &request("  ", "jo@example.org")),
            Err(PortalError::Validation(_))
        ));
        assert!(matches!(
            track_request(&conn, &request("118/24", "")),
            Err(PortalError::Validation(_))
        ));
    }
}
