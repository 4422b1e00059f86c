//! Crate-wide error type.
//!
//! Exit-code conventions:
//!
//! - `2`: usage/configuration errors (unknown label, bad date range)
//! - `3`: no usable data for the requested operation
//! - `4`: upstream/network/schema failures that escaped to the app boundary
//!
//! Note that source adapters deliberately do **not** surface these to callers:
//! per the error taxonomy, adapter failures degrade to empty series plus a
//! logged diagnostic, and only the CLI layer turns `AppError` into an exit code.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
