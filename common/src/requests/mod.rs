//! Request and response payloads shared by the frontend and the backend.
//! Wire names are camelCase to match the URL/JSON contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::import::merge::ExtractedLetter;
use crate::model::letter::{Letter, LetterStatus, Pagination};
use crate::model::user::User;

/// `GET /api/letters` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LettersResponse {
    pub letters: Vec<Letter>,
    pub pagination: Pagination,
}

/// `GET /api/users` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// `GET /api/letters/suggest` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// `PATCH /api/letters/{id}` body: a single whitelisted field update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchLetterRequest {
    pub field: String,
    pub value: serde_json::Value,
}

/// One row of a bulk-create request. `clientRowId` is echoed back on the
/// created letter so attachment uploads can be correlated without relying
/// on the business key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkLetterInput {
    pub client_row_id: String,
    pub number: String,
    #[serde(default)]
    pub organization: String,
    pub received_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub letter_type: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub content: String,
}

/// `POST /api/letters/bulk` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateRequest {
    pub letters: Vec<BulkLetterInput>,
    #[serde(default)]
    pub skip_duplicates: bool,
}

/// A created letter paired with the client row it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreatedLetter {
    pub client_row_id: Option<String>,
    pub letter: Letter,
}

/// `POST /api/letters/bulk` success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResponse {
    pub created: u32,
    pub skipped: u32,
    pub letters: Vec<BulkCreatedLetter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<String>>,
}

/// `POST /api/letters/bulk` rejection body (409/422): row-addressable via
/// the normalized duplicate numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateError {
    pub error: String,
    #[serde(default)]
    pub duplicates: Vec<String>,
}

/// Bulk actions applied to a set of selected letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkAction {
    Delete,
    SetStatus,
    SetOwner,
}

/// `POST /api/letters/actions` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    pub ids: Vec<String>,
    pub action: BulkAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// `POST /api/letters/actions` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkActionResponse {
    pub affected: u32,
}

/// `POST /api/parse-pdf` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsePdfResponse {
    pub data: ExtractedLetter,
}

/// `POST /api/upload` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub attachment_id: String,
    pub md5: String,
    pub size: u64,
}

/// `POST /api/portal/request` body. Public and unauthenticated: an
/// applicant tracks a request by the letter number they were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalRequest {
    pub request_id: String,
    pub contact: String,
}

/// `POST /api/portal/request` response: a read-only snapshot of the
/// tracked letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSnapshot {
    pub number: String,
    pub organization: String,
    pub status: LetterStatus,
    pub received_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
}
