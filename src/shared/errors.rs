use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("This time slot is already booked")]
    SlotTaken {
        restaurant_id: i32,
        date: chrono::NaiveDate,
        time: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether this error originates from the server side rather than the request.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_taken_message_is_stable() {
        let e = DomainError::SlotTaken {
            restaurant_id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            time: "19:00".into(),
        };
        assert_eq!(e.to_string(), "This time slot is already booked");
        assert!(!e.is_server_error());
    }

    #[test]
    fn db_errors_are_server_errors() {
        let e: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(e.is_server_error());
        let msg = e.to_string();
        assert!(msg.starts_with("Database error:"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn not_found_formats_entity_and_id() {
        let e = DomainError::not_found("Restaurant", 42);
        assert_eq!(e.to_string(), "Not found: Restaurant with id=42");
    }
}
