use serde::{Deserialize, Serialize};

/// A user who can own letters. Read-only on the client; the list comes from
/// `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
}
