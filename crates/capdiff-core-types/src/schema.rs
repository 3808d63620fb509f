//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent between the emitting macros,
//! the test capture layer and anything that parses JSON logs.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_HOSTNAME: &str = "hostname";
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_FILE: &str = "file";
pub const FIELD_WINDOW: &str = "window";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
