mod datetime;
mod filesystem;
mod string;

pub use datetime::{excel_serial_to_iso, get_utc_iso_datetime};
pub use filesystem::write_error_to_log;
pub use string::unique_header_names;
