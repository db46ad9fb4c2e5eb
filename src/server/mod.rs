//! Transport-neutral request descriptor and the gate that enforces the
//! contract around business handlers.

pub mod request;
pub mod service;

pub use request::{is_json_content_type, parse_query_params, ContractRequest, MultiMap};
pub use service::{Gate, ValidatedRequest, REQUEST_ID_HEADER};
