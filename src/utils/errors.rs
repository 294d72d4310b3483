use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use validator::ValidationErrors;

use crate::models::ErrorResponse;
use crate::storage::StoreError;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    ValidationError(String),
    ConstraintViolation(String),
    ReferentialIntegrity(String),
    DatabaseError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ServiceError::ConstraintViolation(msg) => write!(f, "Constraint Violation: {}", msg),
            ServiceError::ReferentialIntegrity(msg) => write!(f, "Referential Integrity: {}", msg),
            ServiceError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::NotFound(msg) => {
                log::warn!("Not Found: {}", msg);
                HttpResponse::NotFound().json(ErrorResponse::new(msg.clone()))
            }
            ServiceError::ValidationError(msg) => {
                log::warn!("Validation Error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new(msg.clone()))
            }
            ServiceError::ConstraintViolation(msg) => {
                log::warn!("Constraint Violation: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new(msg.clone()))
            }
            ServiceError::ReferentialIntegrity(msg) => {
                log::warn!("Referential Integrity: {}", msg);
                HttpResponse::Conflict().json(ErrorResponse::new(msg.clone()))
            }
            ServiceError::DatabaseError(msg) => {
                log::error!("Database Error: {}", msg);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Database operation failed")) // Don't expose database details
            }
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => ServiceError::ConstraintViolation(err.to_string()),
            StoreError::Referenced { entity, id } => ServiceError::ReferentialIntegrity(format!(
                "{} {} is still referenced by one or more tasks; reassign or delete those tasks first",
                entity, id
            )),
            StoreError::InvalidReference(msg) => ServiceError::ValidationError(msg),
            StoreError::OrderExhausted { .. } => ServiceError::ValidationError(err.to_string()),
            StoreError::Database(e) => ServiceError::DatabaseError(e.to_string()),
        }
    }
}

// Flatten validator output into "field: message; field: message", sorted by field
impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value ({})", field, e.code),
                })
            })
            .collect();
        parts.sort();
        ServiceError::ValidationError(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn store_errors_map_to_status_codes() {
        let duplicate: ServiceError = StoreError::Duplicate {
            entity: "Project",
            name: "Apollo".to_string(),
        }
        .into();
        assert_eq!(duplicate.error_response().status(), StatusCode::BAD_REQUEST);

        let referenced: ServiceError = StoreError::Referenced {
            entity: "Status",
            id: 2,
        }
        .into();
        assert_eq!(referenced.error_response().status(), StatusCode::CONFLICT);

        let dangling: ServiceError = StoreError::InvalidReference("Project 9 does not exist".into()).into();
        assert_eq!(dangling.error_response().status(), StatusCode::BAD_REQUEST);

        let exhausted: ServiceError = StoreError::OrderExhausted { entity: "Status" }.into();
        assert_eq!(exhausted.error_response().status(), StatusCode::BAD_REQUEST);

        let db: ServiceError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(db.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
