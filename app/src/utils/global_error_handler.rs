use crate::utils::response::APIError;

pub async fn global_error_handler() -> APIError {
    APIError::NotFound("Route not found".to_string())
}
