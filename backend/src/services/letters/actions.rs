use actix_web::{web, HttpResponse, Responder};
use common::model::letter::LetterStatus;
use common::requests::{BulkAction, BulkActionRequest, BulkActionResponse};
use rusqlite::{params_from_iter, Connection};

use crate::db;

/// Actix handler for `POST /api/letters/actions`: bulk delete,
/// set-status, or set-owner over a selection of letter ids.
pub async fn process(body: web::Json<BulkActionRequest>) -> impl Responder {
    let result = db::open()
        .map_err(|e| e.to_string())
        .and_then(|conn| apply_bulk_action(&conn, &body));

    match result {
        Ok(affected) => HttpResponse::Ok().json(BulkActionResponse { affected }),
        Err(e) => HttpResponse::UnprocessableEntity().body(e),
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub fn apply_bulk_action(conn: &Connection, req: &BulkActionRequest) -> Result<u32, String> {
    if req.ids.is_empty() {
        return Err("No letters selected".into());
    }

    let affected = match req.action {
        BulkAction::Delete => {
            // Attachments of deleted letters go with them.
            conn.execute(
                &format!(
                    "DELETE FROM attachments WHERE letter_id IN ({})",
                    placeholders(req.ids.len())
                ),
                params_from_iter(req.ids.iter()),
            )
            .map_err(|e| e.to_string())?;
            conn.execute(
                &format!(
                    "DELETE FROM letters WHERE id IN ({})",
                    placeholders(req.ids.len())
                ),
                params_from_iter(req.ids.iter()),
            )
            .map_err(|e| e.to_string())?
        }
        BulkAction::SetStatus => {
            let key = req
                .value
                .as_deref()
                .ok_or_else(|| "Missing status value".to_string())?;
            let status = LetterStatus::from_key(key)
                .ok_or_else(|| format!("Unknown status: {}", key))?;
            let mut params: Vec<String> = vec![status.as_key().to_string()];
            params.extend(req.ids.iter().cloned());
            conn.execute(
                &format!(
                    "UPDATE letters SET status = ? WHERE id IN ({})",
                    placeholders(req.ids.len())
                ),
                params_from_iter(params.iter()),
            )
            .map_err(|e| e.to_string())?
        }
        BulkAction::SetOwner => {
            let owner = req.value.clone().filter(|v| !v.is_empty());
            let mut params: Vec<Option<String>> = vec![owner];
            params.extend(req.ids.iter().cloned().map(Some));
            conn.execute(
                &format!(
                    "UPDATE letters SET owner_id = ? WHERE id IN ({})",
                    placeholders(req.ids.len())
                ),
                params_from_iter(params.iter()),
            )
            .map_err(|e| e.to_string())?
        }
    };

    Ok(affected as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        for id in ["l1", "l2", "l3"] {
            conn.execute(
                "INSERT INTO letters (id, number, organization, received_date, deadline, status, \
                 letter_type, owner_id, priority, content, comment_count, watcher_count, \
                 created_at) VALUES (?1, ?1, '', NULL, NULL, 'not-reviewed', NULL, NULL, 0, '', \
                 0, 0, '2024-01-01T00:00:00Z')",
                params![id],
            )
            .unwrap();
        }
        conn
    }

    #[test]
    fn delete_removes_selection_and_their_attachments() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO attachments (id, letter_id, filename, md5, size, uploaded_at) \
             VALUES ('a1', 'l1', 'scan.pdf', 'abc', 10, '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let req = BulkActionRequest {
            ids: vec!["l1".into(), "l3".into()],
            action: BulkAction::Delete,
            value: None,
        };
        assert_eq!(apply_bulk_action(&conn, &req).unwrap(), 2);

        let letters: i64 = conn
            .query_row("SELECT COUNT(*) FROM letters", [], |r| r.get(0))
            .unwrap();
        let attachments: i64 = conn
            .query_row("SELECT COUNT(*) FROM attachments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(letters, 1);
        assert_eq!(attachments, 0);
    }

    #[test]
    fn set_status_validates_the_value() {
        let conn = test_conn();
        let req = BulkActionRequest {
            ids: vec!["l1".into(), "l2".into()],
            action: BulkAction::SetStatus,
            value: Some("ready".into()),
        };
        assert_eq!(apply_bulk_action(&conn, &req).unwrap(), 2);

        let bad = BulkActionRequest {
            ids: vec!["l1".into()],
            action: BulkAction::SetStatus,
            value: Some("misplaced".into()),
        };
        assert!(apply_bulk_action(&conn, &bad).is_err());
    }

    #[test]
    fn set_owner_empty_value_unassigns() {
        let conn = test_conn();
        let assign = BulkActionRequest {
            ids: vec!["l1".into()],
            action: BulkAction::SetOwner,
            value: Some("u1".into()),
        };
        apply_bulk_action(&conn, &assign).unwrap();

        let clear = BulkActionRequest {
            ids: vec!["l1".into()],
            action: BulkAction::SetOwner,
            value: Some(String::new()),
        };
        apply_bulk_action(&conn, &clear).unwrap();
        let owner: Option<String> = conn
            .query_row("SELECT owner_id FROM letters WHERE id = 'l1'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(owner, None);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let conn = test_conn();
        let req = BulkActionRequest {
            ids: vec![],
            action: BulkAction::Delete,
            value: None,
        };
        assert!(apply_bulk_action(&conn, &req).is_err());
    }
}
