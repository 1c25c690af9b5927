//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type for the storefront engine, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a duplicate email error
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateEmail).with_detail("email", email.into())
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an admin required error
    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    /// Create an out of stock error
    pub fn out_of_stock(plant: impl Into<String>) -> Self {
        let p = plant.into();
        Self::with_message(ErrorCode::OutOfStock, format!("{} is out of stock", p))
            .with_detail("plant", p)
    }

    /// Create a stock limit reached error
    pub fn stock_limit_reached(plant: impl Into<String>) -> Self {
        Self::new(ErrorCode::StockLimitReached).with_detail("plant", plant.into())
    }

    /// Create a plant not found error
    pub fn plant_not_found(id: impl Into<String>) -> Self {
        Self::new(ErrorCode::PlantNotFound).with_detail("id", id.into())
    }

    /// Create an order not found error
    pub fn order_not_found(id: impl Into<String>) -> Self {
        Self::new(ErrorCode::OrderNotFound).with_detail("id", id.into())
    }

    /// Create an order item not found error
    pub fn order_item_not_found(id: impl Into<String>) -> Self {
        Self::new(ErrorCode::OrderItemNotFound).with_detail("id", id.into())
    }

    /// Create an empty order error
    pub fn order_empty() -> Self {
        Self::new(ErrorCode::OrderEmpty)
    }

    /// Create an invalid price error
    pub fn invalid_price(price: i64) -> Self {
        Self::new(ErrorCode::InvalidPrice).with_detail("price", price)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    /// Log system errors; business errors stay at debug level
    pub fn log(&self) {
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(code = %self.code, message = %self.message, "system error");
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "operation rejected");
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::with_message(ErrorCode::ValidationFailed, "Invalid email format");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid email format");
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "email")
            .with_detail("reason", "required");

        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "email");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_convenience_constructors() {
        let err = AppError::out_of_stock("Monstera");
        assert_eq!(err.code, ErrorCode::OutOfStock);
        assert_eq!(err.message, "Monstera is out of stock");
        assert!(err.details.as_ref().unwrap().contains_key("plant"));

        let err = AppError::stock_limit_reached("Monstera");
        assert_eq!(err.code, ErrorCode::StockLimitReached);

        let err = AppError::duplicate_email("a@b.com");
        assert_eq!(err.code, ErrorCode::DuplicateEmail);
        assert_eq!(err.details.unwrap().get("email").unwrap(), "a@b.com");

        let err = AppError::invalid_credentials();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let err = AppError::admin_required();
        assert_eq!(err.code, ErrorCode::AdminRequired);

        let err = AppError::database("connection lost");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "connection lost");
    }

    #[test]
    fn test_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found");
        assert_eq!(format!("{}", err), "Order 42 not found");
    }

    #[test]
    fn test_serialize() {
        let err = AppError::new(ErrorCode::OutOfStock);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("6002"));
        assert!(json.contains("Out of stock"));
    }
}
