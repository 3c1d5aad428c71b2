pub mod log_redact;
pub mod logging;
pub mod upstream;
