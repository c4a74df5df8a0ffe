use serde::{Deserialize, Serialize};

/// Request payload carrying a numeric value for an admin correction
#[derive(Debug, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    pub value: f64,
}
