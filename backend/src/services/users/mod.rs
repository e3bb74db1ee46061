use actix_web::web::{get, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::user::User;
use common::requests::UsersResponse;
use rusqlite::Connection;

use crate::db;

const API_PATH: &str = "/api/users";

/// Configures the Actix scope for the assignable-users listing.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

pub async fn process() -> impl Responder {
    let result = db::open()
        .map_err(|e| e.to_string())
        .and_then(|conn| get_users(&conn));

    match result {
        Ok(users) => HttpResponse::Ok().json(UsersResponse { users }),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error loading users: {}", e)),
    }
}

pub fn get_users(conn: &Connection) -> Result<Vec<User>, String> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM users ORDER BY name")
        .map_err(|e| e.to_string())?;
    let users = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    Ok(users)
}
