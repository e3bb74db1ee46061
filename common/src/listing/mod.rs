//! Pure state machinery behind the letters list view: filter/sort/pagination
//! state with its page-reset invariant, the TTL response cache, and the
//! request-token sequencing that supersedes in-flight fetches.
//!
//! Nothing in here touches the browser. The frontend component owns one
//! instance of each piece and passes in the clock, so every invariant is
//! testable with plain `cargo test`.

pub mod cache;
pub mod filter;
pub mod sequence;
