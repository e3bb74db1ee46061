//! SQLite access for the letters tracker.
//!
//! Handlers open a connection per request on the fixed database file and
//! delegate to core functions that take `&Connection`, so integration
//! tests can run the same logic against an in-memory database.

use chrono::NaiveDate;
use common::model::letter::{Letter, LetterStatus};
use rusqlite::{params, Connection, Row};

pub const DB_FILE: &str = "letterdesk.sqlite";

/// Column list matching `letter_from_row`. Keep the two in sync.
pub const LETTER_COLUMNS: &str = "id, number, organization, received_date, deadline, status, \
     letter_type, owner_id, priority, content, comment_count, watcher_count";

/// Opens the application database and ensures the schema exists.
pub fn open() -> rusqlite::Result<Connection> {
    let conn = Connection::open(DB_FILE)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates tables and indexes idempotently and seeds the user list on
/// first run.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS letters(
            id TEXT PRIMARY KEY,
            number TEXT NOT NULL,
            organization TEXT NOT NULL DEFAULT '',
            received_date TEXT,
            deadline TEXT,
            status TEXT NOT NULL DEFAULT 'not-reviewed',
            letter_type TEXT,
            owner_id TEXT,
            priority INTEGER NOT NULL DEFAULT 0,
            content TEXT NOT NULL DEFAULT '',
            comment_count INTEGER NOT NULL DEFAULT 0,
            watcher_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_letters_number ON letters(number)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_letters_deadline ON letters(deadline)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attachments(
            id TEXT PRIMARY KEY,
            letter_id TEXT NOT NULL,
            filename TEXT NOT NULL,
            md5 TEXT NOT NULL,
            size INTEGER NOT NULL,
            uploaded_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attachments_letter ON attachments(letter_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS portal_requests(
            id TEXT PRIMARY KEY,
            number TEXT NOT NULL,
            contact TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    seed_users(conn)?;
    Ok(())
}

/// Registration is out of scope, so a fresh database gets a default set of
/// assignable users.
fn seed_users(conn: &Connection) -> rusqlite::Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }
    for (id, name) in [
        ("u1", "Anna Keller"),
        ("u2", "Boris Malin"),
        ("u3", "Carla Reyes"),
        ("u4", "Derek Osei"),
    ] {
        conn.execute(
            "INSERT INTO users (id, name) VALUES (?1, ?2)",
            params![id, name],
        )?;
    }
    Ok(())
}

/// Maps a row selected with `LETTER_COLUMNS` into the shared model.
pub fn letter_from_row(row: &Row) -> rusqlite::Result<Letter> {
    Ok(Letter {
        id: row.get(0)?,
        number: row.get(1)?,
        organization: row.get(2)?,
        received_date: parse_date(row.get::<_, Option<String>>(3)?),
        deadline: parse_date(row.get::<_, Option<String>>(4)?),
        status: LetterStatus::from_key(&row.get::<_, String>(5)?)
            .unwrap_or(LetterStatus::NotReviewed),
        letter_type: row.get(6)?,
        owner: row.get(7)?,
        priority: row.get(8)?,
        content: row.get(9)?,
        comment_count: row.get::<_, i64>(10)? as u32,
        watcher_count: row.get::<_, i64>(11)? as u32,
    })
}

/// Dates are stored as ISO `YYYY-MM-DD` text.
pub fn parse_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| s.parse().ok())
}

pub fn date_to_sql(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.to_string())
}
