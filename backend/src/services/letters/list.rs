use actix_web::{HttpRequest, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use common::listing::filter::{FilterState, QuickFilter, SortField, SortOrder};
use common::model::letter::Pagination;
use common::requests::LettersResponse;
use rusqlite::{params_from_iter, Connection};

use crate::db;

/// Actix handler for `GET /api/letters`. The raw query string is parsed
/// with the same canonical parser the frontend uses, so client and server
/// agree on every dimension.
pub async fn process(req: HttpRequest) -> impl Responder {
    let filters = FilterState::from_query_string(req.query_string());
    let today = Local::now().date_naive();

    let result = db::open()
        .map_err(|e| e.to_string())
        .and_then(|conn| list_letters(&conn, &filters, today));

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error listing letters: {}", e))
        }
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::ReceivedDate => "received_date",
        SortField::Deadline => "deadline",
        SortField::Number => "number",
        SortField::Organization => "organization",
        SortField::Priority => "priority",
        SortField::Status => "status",
    }
}

/// Builds the WHERE clause and parameter list for one filter state.
/// Conditions and parameters are pushed in lockstep; positional `?`
/// placeholders bind in push order.
fn build_where(filters: &FilterState, today: NaiveDate) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(status) = filters.status {
        conditions.push("status = ?".into());
        params.push(status.as_key().into());
    }
    match filters.quick {
        Some(QuickFilter::Overdue) => {
            conditions
                .push("deadline IS NOT NULL AND deadline < ? AND status != 'done'".into());
            params.push(today.to_string());
        }
        Some(QuickFilter::DueToday) => {
            conditions.push("deadline = ?".into());
            params.push(today.to_string());
        }
        Some(QuickFilter::Unassigned) => {
            conditions.push("owner_id IS NULL".into());
        }
        None => {}
    }
    if let Some(owner) = &filters.owner {
        conditions.push("owner_id = ?".into());
        params.push(owner.clone());
    }
    if let Some(letter_type) = &filters.letter_type {
        conditions.push("letter_type = ?".into());
        params.push(letter_type.clone());
    }
    let search = filters.search.trim();
    if !search.is_empty() {
        conditions.push("(number LIKE ? OR organization LIKE ? OR content LIKE ?)".into());
        let pattern = format!("%{}%", search);
        params.push(pattern.clone());
        params.push(pattern.clone());
        params.push(pattern);
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

/// Core listing query: COUNT for pagination plus the page slice itself,
/// ordered by the requested column with `id` as a stable tiebreak.
pub fn list_letters(
    conn: &Connection,
    filters: &FilterState,
    today: NaiveDate,
) -> Result<LettersResponse, String> {
    let (where_sql, where_params) = build_where(filters, today);

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM letters{}", where_sql),
            params_from_iter(where_params.iter()),
            |row| row.get(0),
        )
        .map_err(|e| e.to_string())?;

    let limit = filters.limit.clamp(1, 100);
    let page = filters.page.max(1);
    let offset = (page - 1) * limit;
    let direction = match filters.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    let sql = format!(
        "SELECT {} FROM letters{} ORDER BY {} {}, id LIMIT {} OFFSET {}",
        db::LETTER_COLUMNS,
        where_sql,
        sort_column(filters.sort_by),
        direction,
        limit,
        offset
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;
    let letters = stmt
        .query_map(params_from_iter(where_params.iter()), db::letter_from_row)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(LettersResponse {
        letters,
        pagination: Pagination::new(page, limit, total as u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::letter::LetterStatus;
    use rusqlite::params;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn
    }

    fn insert(
        conn: &Connection,
        id: &str,
        number: &str,
        organization: &str,
        deadline: Option<&str>,
        status: &str,
        owner: Option<&str>,
    ) {
        conn.execute(
            "INSERT INTO letters (id, number, organization, received_date, deadline, status, \
             letter_type, owner_id, priority, content, comment_count, watcher_count, created_at) \
             VALUES (?1, ?2, ?3, NULL, ?4, ?5, NULL, ?6, 0, '', 0, 0, '2024-01-01T00:00:00Z')",
            params![id, number, organization, deadline, status, owner],
        )
        .unwrap();
    }

    fn today() -> NaiveDate {
        "2024-03-15".parse().unwrap()
    }

    fn seed(conn: &Connection) {
        insert(conn, "l1", "001", "Harbor Authority", Some("2024-03-10"), "in-progress", Some("u1"));
        insert(conn, "l2", "002", "City Archive", Some("2024-03-15"), "not-reviewed", None);
        insert(conn, "l3", "003", "Ministry of Works", Some("2024-03-01"), "done", Some("u2"));
        insert(conn, "l4", "004", "Harbor Authority", None, "accepted", None);
    }

    #[test]
    fn status_filter_narrows_results() {
        let conn = test_conn();
        seed(&conn);
        let mut filters = FilterState::default();
        filters.set_status(Some(LetterStatus::Accepted));

        let response = list_letters(&conn, &filters, today()).unwrap();
        assert_eq!(response.pagination.total, 1);
        assert_eq!(response.letters[0].id, "l4");
    }

    #[test]
    fn overdue_quick_filter_excludes_done_letters() {
        let conn = test_conn();
        seed(&conn);
        let mut filters = FilterState::default();
        filters.set_quick(Some(QuickFilter::Overdue));

        let response = list_letters(&conn, &filters, today()).unwrap();
        // l1 is overdue; l3's deadline is older but it is done; l2 is due
        // today, not past.
        assert_eq!(response.pagination.total, 1);
        assert_eq!(response.letters[0].id, "l1");
    }

    #[test]
    fn unassigned_quick_filter_matches_null_owner() {
        let conn = test_conn();
        seed(&conn);
        let mut filters = FilterState::default();
        filters.set_quick(Some(QuickFilter::Unassigned));

        let response = list_letters(&conn, &filters, today()).unwrap();
        let ids: Vec<_> = response.letters.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(response.pagination.total, 2);
        assert!(ids.contains(&"l2") && ids.contains(&"l4"));
    }

    #[test]
    fn search_matches_number_and_organization() {
        let conn = test_conn();
        seed(&conn);
        let mut filters = FilterState::default();
        filters.set_search("Harbor".into());

        let response = list_letters(&conn, &filters, today()).unwrap();
        assert_eq!(response.pagination.total, 2);

        filters.set_search("003".into());
        let response = list_letters(&conn, &filters, today()).unwrap();
        assert_eq!(response.pagination.total, 1);
        assert_eq!(response.letters[0].id, "l3");
    }

    #[test]
    fn sorting_and_pagination_slice_the_set() {
        let conn = test_conn();
        seed(&conn);
        let mut filters = FilterState::default();
        filters.toggle_sort(SortField::Number); // ascending on a new field
        filters.set_limit(2);

        let first = list_letters(&conn, &filters, today()).unwrap();
        assert_eq!(first.pagination.total, 4);
        assert_eq!(first.pagination.total_pages, 2);
        let ids: Vec<_> = first.letters.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);

        filters.set_page(2);
        let second = list_letters(&conn, &filters, today()).unwrap();
        let ids: Vec<_> = second.letters.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l3", "l4"]);

        filters.toggle_sort(SortField::Number); // flip to descending
        filters.set_page(1);
        let flipped = list_letters(&conn, &filters, today()).unwrap();
        let ids: Vec<_> = flipped.letters.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l4", "l3"]);
    }

    #[test]
    fn empty_database_lists_cleanly() {
        let conn = test_conn();
        let response = list_letters(&conn, &FilterState::default(), today()).unwrap();
        assert!(response.letters.is_empty());
        assert_eq!(response.pagination.total_pages, 0);
    }
}
