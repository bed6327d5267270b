//! Gateway types module
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for API input
//! - [`CreateTransferRequest`], [`CreateAccountRequest`]: request bodies
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error envelope with HTTP status

pub mod money;
pub mod request;
pub mod response;

// Re-export commonly used types at module root
pub use money::StrictDecimal;
pub use request::{CreateAccountRequest, CreateTransferRequest};
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};
