use serde::{Deserialize, Serialize};

pub mod todo;

/// JSON body used for health checks and every error response.
#[derive(Serialize, Deserialize, Debug)]
pub struct Response {
    pub message: String,
}
