//! Row identifiers.
//!
//! Rows created in an editing session get a temporary id with the
//! [`TEMP_ID_PREFIX`] until the store persists them. Stores replace temporary
//! (or missing) ids with a freshly minted one on create.

pub const TEMP_ID_PREFIX: &str = "tmp-";
const STORED_ID_PREFIX: &str = "t-";

pub fn new_temp_id() -> String {
    format!("{TEMP_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

pub fn new_stored_id() -> String {
    format!("{STORED_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// Id a store should persist a new row under: the client's id when it is a
/// real one, otherwise a new one.
pub fn resolve_create_id(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(id) if !id.is_empty() && !is_temp_id(id) => id.to_string(),
        _ => new_stored_id(),
    }
}
