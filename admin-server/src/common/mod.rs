//! Common infrastructure: response envelope, errors, logging

pub mod error;
pub mod logger;

pub use error::{
    ApiResponse, AppError, AppResult, BulkDetails, bulk_outcome, fail, ok_data, ok_message,
};
