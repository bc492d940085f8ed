pub mod server;
pub mod staging;
pub mod utils;

pub use cabinet_lib::ERRORS_LOG_FILE;
