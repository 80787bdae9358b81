use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Command to record bottles entering the cellar.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordAcquisitionCommand {
    pub wine_id: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    /// Free-form provenance tag ("purchase", "gift", ...).
    pub acquisition_type: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub bought_at: Option<String>,

    /// Business time of the acquisition; defaults to now, may be backdated.
    pub event_date: Option<DateTime<Utc>>,
}

/// Command to record bottles drunk.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordConsumptionCommand {
    pub wine_id: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    pub event_date: Option<DateTime<Utc>>,
}

/// Command to correct a previously recorded consumption. Appends a new
/// zero-quantity drink event; the original entry is never edited.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordCorrectionCommand {
    pub wine_id: i64,

    /// The drink event whose quantity was mis-recorded.
    pub original_drink_event_id: i64,

    /// Bottles to restore (positive) or additionally remove (negative).
    pub error_quantity: i32,

    pub event_date: Option<DateTime<Utc>>,
}
