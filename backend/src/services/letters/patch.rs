use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use common::model::letter::{Letter, LetterStatus};
use common::requests::PatchLetterRequest;
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::db;

/// Why a single-field update was refused.
#[derive(Debug)]
pub enum PatchError {
    UnknownField(String),
    BadValue(String),
    NotFound,
    Db(String),
}

/// Actix handler for `PATCH /api/letters/{letter_id}` with body
/// `{field, value}`.
pub async fn process(
    letter_id: web::Path<String>,
    body: web::Json<PatchLetterRequest>,
) -> impl Responder {
    let result = db::open()
        .map_err(|e| PatchError::Db(e.to_string()))
        .and_then(|conn| patch_letter(&conn, &letter_id, &body));

    match result {
        Ok(letter) => HttpResponse::Ok().json(letter),
        Err(PatchError::UnknownField(field)) => {
            HttpResponse::UnprocessableEntity().body(format!("Unknown field: {}", field))
        }
        Err(PatchError::BadValue(message)) => HttpResponse::UnprocessableEntity().body(message),
        Err(PatchError::NotFound) => HttpResponse::NotFound().body("Letter not found"),
        Err(PatchError::Db(e)) => {
            HttpResponse::ServiceUnavailable().body(format!("Error updating letter: {}", e))
        }
    }
}

fn as_string(value: &Value, field: &str) -> Result<String, PatchError> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| PatchError::BadValue(format!("{} must be a string", field)))
}

fn as_optional_date(value: &Value, field: &str) -> Result<Option<String>, PatchError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => {
            let date: NaiveDate = s
                .parse()
                .map_err(|_| PatchError::BadValue(format!("{} must be YYYY-MM-DD", field)))?;
            Ok(Some(date.to_string()))
        }
        _ => Err(PatchError::BadValue(format!("{} must be a date string", field))),
    }
}

/// Applies one whitelisted single-field update and returns the updated
/// letter. Unknown fields and malformed values are rejected before any
/// write happens.
pub fn patch_letter(
    conn: &Connection,
    letter_id: &str,
    req: &PatchLetterRequest,
) -> Result<Letter, PatchError> {
    let (column, sql_value): (&str, Option<String>) = match req.field.as_str() {
        "number" => {
            let number = as_string(&req.value, "number")?;
            if number.trim().is_empty() {
                return Err(PatchError::BadValue("number must not be empty".into()));
            }
            ("number", Some(number))
        }
        "organization" => ("organization", Some(as_string(&req.value, "organization")?)),
        "content" => ("content", Some(as_string(&req.value, "content")?)),
        "receivedDate" => ("received_date", as_optional_date(&req.value, "receivedDate")?),
        "deadline" => ("deadline", as_optional_date(&req.value, "deadline")?),
        "status" => {
            let key = as_string(&req.value, "status")?;
            let status = LetterStatus::from_key(&key)
                .ok_or_else(|| PatchError::BadValue(format!("Unknown status: {}", key)))?;
            ("status", Some(status.as_key().to_string()))
        }
        "type" => {
            let value = match &req.value {
                Value::Null => None,
                other => Some(as_string(other, "type")?).filter(|s| !s.is_empty()),
            };
            ("letter_type", value)
        }
        "owner" => {
            let value = match &req.value {
                Value::Null => None,
                other => Some(as_string(other, "owner")?).filter(|s| !s.is_empty()),
            };
            ("owner_id", value)
        }
        "priority" => {
            let priority = req
                .value
                .as_i64()
                .ok_or_else(|| PatchError::BadValue("priority must be an integer".into()))?;
            ("priority", Some(priority.to_string()))
        }
        other => return Err(PatchError::UnknownField(other.to_string())),
    };

    let affected = conn
        .execute(
            &format!("UPDATE letters SET {} = ?1 WHERE id = ?2", column),
            params![sql_value, letter_id],
        )
        .map_err(|e| PatchError::Db(e.to_string()))?;
    if affected == 0 {
        return Err(PatchError::NotFound);
    }

    conn.query_row(
        &format!(
            "SELECT {} FROM letters WHERE id = ?1",
            db::LETTER_COLUMNS
        ),
        params![letter_id],
        db::letter_from_row,
    )
    .map_err(|e| PatchError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO letters (id, number, organization, received_date, deadline, status, \
             letter_type, owner_id, priority, content, comment_count, watcher_count, created_at) \
             VALUES ('l1', '001', 'City Archive', NULL, NULL, 'not-reviewed', NULL, NULL, 0, '', \
             0, 0, '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn
    }

    fn patch(field: &str, value: serde_json::Value) -> PatchLetterRequest {
        PatchLetterRequest {
            field: field.to_string(),
            value,
        }
    }

    #[test]
    fn status_update_round_trips() {
        let conn = test_conn();
        let letter = patch_letter(&conn, "l1", &patch("status", json!("in-progress"))).unwrap();
        assert_eq!(letter.status, LetterStatus::InProgress);
    }

    #[test]
    fn deadline_accepts_iso_date_and_null() {
        let conn = test_conn();
        let letter = patch_letter(&conn, "l1", &patch("deadline", json!("2024-04-01"))).unwrap();
        assert_eq!(letter.deadline, Some("2024-04-01".parse().unwrap()));

        let letter = patch_letter(&conn, "l1", &patch("deadline", json!(null))).unwrap();
        assert_eq!(letter.deadline, None);
    }

    #[test]
    fn unknown_field_is_rejected_before_any_write() {
        let conn = test_conn();
        assert!(matches!(
            patch_letter(&conn, "l1", &patch("commentCount", json!(7))),
            Err(PatchError::UnknownField(_))
        ));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let conn = test_conn();
        assert!(matches!(
            patch_letter(&conn, "l1", &patch("deadline", json!("next week"))),
            Err(PatchError::BadValue(_))
        ));
        assert!(matches!(
            patch_letter(&conn, "l1", &patch("status", json!("lost"))),
            Err(PatchError::BadValue(_))
        ));
        assert!(matches!(
            patch_letter(&conn, "l1", &patch("number", json!("   "))),
            Err(PatchError::BadValue(_))
        ));
    }

    #[test]
    fn missing_letter_is_not_found() {
        let conn = test_conn();
        assert!(matches!(
            patch_letter(&conn, "ghost", &patch("status", json!("done"))),
            Err(PatchError::NotFound)
        ));
    }

    #[test]
    fn owner_can_be_cleared() {
        let conn = test_conn();
        patch_letter(&conn, "l1", &patch("owner", json!("u2"))).unwrap();
        let letter = patch_letter(&conn, "l1", &patch("owner", json!(null))).unwrap();
        assert_eq!(letter.owner, None);
    }
}
