//! Pure logic of the bulk-import reconciler: the transient row model,
//! the fill-empty merge of extraction results, deadline inference, and
//! business-key deduplication. The frontend dialog drives these; the
//! backend reuses the same dedup normalization so client and server agree
//! on what counts as a duplicate.

pub mod deadline;
pub mod dedup;
pub mod merge;
pub mod row;
