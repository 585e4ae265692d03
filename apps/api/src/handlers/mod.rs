//! Request handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
pub mod stock;

use serde::Serialize;

/// `{ "message": ... }` acknowledgement for operations with nothing to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        MessageResponse { message }
    }
}
