use actix_web::{web, HttpResponse, Responder};
use common::requests::SuggestResponse;
use rusqlite::{params, Connection};
use serde::Deserialize;

use crate::db;

/// Hard bound on the suggestion count; the stream is meant to be cheap.
const SUGGEST_LIMIT: usize = 8;

#[derive(Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// Actix handler for `GET /api/letters/suggest?q=`.
pub async fn process(query: web::Query<SuggestQuery>) -> impl Responder {
    let result = db::open()
        .map_err(|e| e.to_string())
        .and_then(|conn| suggest(&conn, &query.q));

    match result {
        Ok(suggestions) => HttpResponse::Ok().json(SuggestResponse { suggestions }),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error loading suggestions: {}", e))
        }
    }
}

/// Returns up to `SUGGEST_LIMIT` distinct letter numbers and organization
/// names matching the prefix, numbers first.
pub fn suggest(conn: &Connection, q: &str) -> Result<Vec<String>, String> {
    let q = q.trim();
    if q.is_empty() {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", q);
    let mut suggestions: Vec<String> = Vec::new();

    for sql in [
        "SELECT DISTINCT number FROM letters WHERE number LIKE ?1 ORDER BY number LIMIT ?2",
        "SELECT DISTINCT organization FROM letters WHERE organization LIKE ?1 \
         AND organization != '' ORDER BY organization LIMIT ?2",
    ] {
        let mut stmt = conn.prepare(sql).map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map(params![pattern, SUGGEST_LIMIT as i64], |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e| e.to_string())?;
        for row in rows {
            let value = row.map_err(|e| e.to_string())?;
            if !suggestions.contains(&value) {
                suggestions.push(value);
            }
            if suggestions.len() >= SUGGEST_LIMIT {
                return Ok(suggestions);
            }
        }
    }
    Ok(suggestions)
}
