use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;

pub fn validate_input<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::UnprocessableEntity(format!("Validation failed: {errors}")))
}

/// Lease terms as typed into the lease form. Numeric fields accept JSON
/// numbers or numeric strings; anything else counts as missing.
#[derive(Debug, Clone, Deserialize, serde::Serialize, Validate)]
pub struct BufferPreviewInput {
    #[validate(length(max = 32))]
    pub starts_on: Option<String>,
    #[validate(length(max = 32))]
    pub ends_on: Option<String>,
    pub monthly_rent: Option<Value>,
    pub rate_per_sqft_monthly: Option<Value>,
    pub allocated_area_sqft: Option<Value>,
    pub buffer_days: Option<Value>,
    pub extended_buffer_days: Option<Value>,
    pub extended_buffer_charge_percent: Option<Value>,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct RentPreviewInput {
    pub monthly_rent: Option<Value>,
    pub rate_per_sqft_monthly: Option<Value>,
    pub allocated_area_sqft: Option<Value>,
}

pub fn value_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|parsed| parsed.is_finite())
}
