use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::import::dedup::{duplicate_keys, normalize_number};
use common::model::letter::{Letter, LetterStatus};
use common::requests::{
    BulkCreateError, BulkCreateRequest, BulkCreateResponse, BulkCreatedLetter,
};
use rusqlite::{params, Connection};

use crate::db;

/// Why a batch was rejected as a whole. Creation is all-or-nothing: a
/// rejection means no row of the batch was stored.
#[derive(Debug)]
pub enum BulkRejection {
    Duplicates { message: String, numbers: Vec<String> },
    Validation(String),
    Db(String),
}

/// Actix handler for `POST /api/letters/bulk`.
pub async fn process(body: web::Json<BulkCreateRequest>) -> impl Responder {
    let result = db::open()
        .map_err(|e| BulkRejection::Db(e.to_string()))
        .and_then(|mut conn| bulk_create(&mut conn, &body));

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(BulkRejection::Duplicates { message, numbers }) => {
            HttpResponse::Conflict().json(BulkCreateError {
                error: message,
                duplicates: numbers,
            })
        }
        Err(BulkRejection::Validation(message)) => {
            HttpResponse::UnprocessableEntity().json(BulkCreateError {
                error: message,
                duplicates: Vec::new(),
            })
        }
        Err(BulkRejection::Db(e)) => {
            HttpResponse::ServiceUnavailable().body(format!("Error creating letters: {}", e))
        }
    }
}

/// Creates a batch of letters in one transaction.
///
/// Duplicate handling:
/// - collisions *within* the batch (trim + case-fold) always reject the
///   whole batch, naming the numbers — the client should have fixed them;
/// - collisions against stored letters reject unless `skipDuplicates` is
///   set, in which case the colliding rows are skipped and counted.
pub fn bulk_create(
    conn: &mut Connection,
    req: &BulkCreateRequest,
) -> Result<BulkCreateResponse, BulkRejection> {
    if req.letters.is_empty() {
        return Err(BulkRejection::Validation("The batch contains no letters".into()));
    }
    for (index, input) in req.letters.iter().enumerate() {
        if normalize_number(&input.number).is_empty() {
            return Err(BulkRejection::Validation(format!(
                "Row {} has no letter number",
                index + 1
            )));
        }
    }

    let in_batch = duplicate_keys(req.letters.iter().map(|l| l.number.as_str()));
    if !in_batch.is_empty() {
        return Err(BulkRejection::Duplicates {
            message: format!(
                "Duplicate letter number in batch: {}",
                in_batch.join(", ")
            ),
            numbers: in_batch,
        });
    }

    let mut existing: Vec<String> = Vec::new();
    {
        let mut stmt = conn
            .prepare("SELECT 1 FROM letters WHERE LOWER(TRIM(number)) = ?1 LIMIT 1")
            .map_err(|e| BulkRejection::Db(e.to_string()))?;
        for input in &req.letters {
            let key = normalize_number(&input.number);
            let found = stmt
                .exists(params![key])
                .map_err(|e| BulkRejection::Db(e.to_string()))?;
            if found {
                existing.push(key);
            }
        }
    }
    if !existing.is_empty() && !req.skip_duplicates {
        return Err(BulkRejection::Duplicates {
            message: format!(
                "Letters with these numbers already exist: {}",
                existing.join(", ")
            ),
            numbers: existing,
        });
    }

    let tx = conn
        .transaction()
        .map_err(|e| BulkRejection::Db(e.to_string()))?;
    let mut created: Vec<BulkCreatedLetter> = Vec::new();
    for input in &req.letters {
        if existing.contains(&normalize_number(&input.number)) {
            continue;
        }
        let letter = Letter {
            id: uuid::Uuid::new_v4().to_string(),
            number: input.number.trim().to_string(),
            organization: input.organization.clone(),
            received_date: input.received_date,
            deadline: input.deadline,
            status: LetterStatus::NotReviewed,
            letter_type: input.letter_type.clone().filter(|t| !t.is_empty()),
            owner: None,
            priority: input.priority,
            content: input.content.clone(),
            comment_count: 0,
            watcher_count: 0,
        };
        tx.execute(
            "INSERT INTO letters (id, number, organization, received_date, deadline, status, \
             letter_type, owner_id, priority, content, comment_count, watcher_count, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, 0, ?11)",
            params![
                letter.id,
                letter.number,
                letter.organization,
                db::date_to_sql(letter.received_date),
                db::date_to_sql(letter.deadline),
                letter.status.as_key(),
                letter.letter_type,
                letter.owner,
                letter.priority,
                letter.content,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| BulkRejection::Db(e.to_string()))?;

        created.push(BulkCreatedLetter {
            client_row_id: Some(input.client_row_id.clone()),
            letter,
        });
    }
    tx.commit().map_err(|e| BulkRejection::Db(e.to_string()))?;

    Ok(BulkCreateResponse {
        created: created.len() as u32,
        skipped: existing.len() as u32,
        letters: created,
        duplicates: if existing.is_empty() {
            None
        } else {
            Some(existing)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::requests::BulkLetterInput;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn
    }

    fn input(row_id: &str, number: &str) -> BulkLetterInput {
        BulkLetterInput {
            client_row_id: row_id.to_string(),
            number: number.to_string(),
            organization: "City Archive".into(),
            received_date: Some("2024-01-10".parse().unwrap()),
            deadline: None,
            letter_type: None,
            priority: 0,
            content: String::new(),
        }
    }

    fn count_letters(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM letters", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn empty_batch_is_rejected() {
        let mut conn = test_conn();
        let req = BulkCreateRequest {
            letters: vec![],
            skip_duplicates: false,
        };
        assert!(matches!(
            bulk_create(&mut conn, &req),
            Err(BulkRejection::Validation(_))
        ));
    }

    #[test]
    fn in_batch_duplicate_rejects_whole_batch_and_names_number() {
        let mut conn = test_conn();
        let req = BulkCreateRequest {
            letters: vec![input("r1", "001"), input("r2", "001 "), input("r3", "002")],
            skip_duplicates: false,
        };

        match bulk_create(&mut conn, &req) {
            Err(BulkRejection::Duplicates { message, numbers }) => {
                assert!(message.contains("001"), "message was: {}", message);
                assert_eq!(numbers, vec!["001".to_string()]);
            }
            other => panic!("expected duplicate rejection, got {:?}", other.is_ok()),
        }
        // Rows 1 and 3 must not have been created either.
        assert_eq!(count_letters(&conn), 0);
    }

    #[test]
    fn stored_duplicate_rejects_without_skip_toggle() {
        let mut conn = test_conn();
        let first = BulkCreateRequest {
            letters: vec![input("r1", "A01")],
            skip_duplicates: false,
        };
        bulk_create(&mut conn, &first).unwrap();

        // Same business key, different case: still a duplicate.
        let second = BulkCreateRequest {
            letters: vec![input("r2", "a01")],
            skip_duplicates: false,
        };
        assert!(matches!(
            bulk_create(&mut conn, &second),
            Err(BulkRejection::Duplicates { .. })
        ));
        assert_eq!(count_letters(&conn), 1);
    }

    #[test]
    fn skip_duplicates_reports_created_and_skipped() {
        let mut conn = test_conn();
        let first = BulkCreateRequest {
            letters: vec![input("r1", "100")],
            skip_duplicates: false,
        };
        bulk_create(&mut conn, &first).unwrap();

        let second = BulkCreateRequest {
            letters: vec![input("r2", "100"), input("r3", "101"), input("r4", "102")],
            skip_duplicates: true,
        };
        let response = bulk_create(&mut conn, &second).unwrap();

        assert_eq!(response.created, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(response.duplicates, Some(vec!["100".to_string()]));
        assert_eq!(count_letters(&conn), 3);
    }

    #[test]
    fn created_letters_echo_their_client_row_id() {
        let mut conn = test_conn();
        let req = BulkCreateRequest {
            letters: vec![input("row-a", "1/24"), input("row-b", "2/24")],
            skip_duplicates: false,
        };
        let response = bulk_create(&mut conn, &req).unwrap();

        let row_ids: Vec<_> = response
            .letters
            .iter()
            .map(|c| c.client_row_id.clone().unwrap())
            .collect();
        assert_eq!(row_ids, vec!["row-a".to_string(), "row-b".to_string()]);
        assert!(response.letters.iter().all(|c| !c.letter.id.is_empty()));
        assert_eq!(response.letters[0].letter.status, LetterStatus::NotReviewed);
    }

    #[test]
    fn missing_number_is_a_validation_error() {
        let mut conn = test_conn();
        let req = BulkCreateRequest {
            letters: vec![input("r1", "  ")],
            skip_duplicates: false,
        };
        match bulk_create(&mut conn, &req) {
            Err(BulkRejection::Validation(message)) => assert!(message.contains("Row 1")),
            _ => panic!("expected validation error"),
        }
    }
}
