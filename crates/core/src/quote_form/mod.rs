//! Quote form module - translation of form-shaped records into the backend's
//! persisted field names.

mod field_map;
mod translator;

pub use field_map::{quote_field_map, FieldMap, QUOTE_FIELD_MAP};
pub use translator::{to_backend_payload, translate, translate_value};
