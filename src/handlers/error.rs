use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::common::ApiResponse;
use crate::services::error::{ErrorKind, ServiceError};

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        ServiceError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.kind() {
            ErrorKind::Infrastructure => {
                tracing::error!("Request failed: {}", self);
                "An unexpected error occurred".to_string()
            }
            ErrorKind::NotFound | ErrorKind::Validation => {
                tracing::warn!("Request rejected: {}", self);
                self.to_string()
            }
        };
        HttpResponse::build(ServiceError::status_code(self)).json(ApiResponse::error(message))
    }
}
