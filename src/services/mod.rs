//! Service layer for lead unit management.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI or embedded behind another front end.

pub mod dates;
pub mod error_handler;
pub mod lead_unit;
pub mod messages;
pub mod notify;

pub use dates::{parse_flexible_date, DateInput, INVALID_DATE};
pub use error_handler::{resolve_message, ErrorHandler};
pub use lead_unit::{
    build_lead_unit_payload, build_payload_to_send, decode_spreadsheet, import_key,
    save_error_workbook, Blob, DirectorySink, Endpoints, ExportError, FileSink,
    LeadUnitService, LeadUnitUpdateData, SelectionState, IMPORT_ERROR_FILENAME, SPREADSHEET_MIME,
};
pub use messages::{Locale, Messages};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notifier};
