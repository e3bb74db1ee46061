use common::import::merge::ExtractedLetter;
use common::requests::BulkCreateResponse;

/// Editable fields of one import row.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Number,
    Organization,
    ReceivedDate,
    Deadline,
    Type,
    Priority,
    Content,
}

pub enum Msg {
    OpenFileDialog,
    FilesPicked(Vec<web_sys::File>),
    ExtractFinished {
        row_id: String,
        result: Result<ExtractedLetter, String>,
    },
    EditField {
        row_id: String,
        field: RowField,
        value: String,
    },
    AddRow,
    RemoveRow(String),
    SetSkipDuplicates(bool),
    SetOverwrite(bool),
    SetDefaultDate(String),
    SetDefaultDeadline(String),
    SetDefaultType(String),
    ApplyDefaults {
        only_empty: bool,
    },
    Submit,
    SubmitSucceeded(BulkCreateResponse),
    SubmitRejected {
        message: String,
        duplicates: Vec<String>,
    },
    AttachmentsUploaded {
        uploaded: usize,
        failed: usize,
    },
    Cancel,
}
