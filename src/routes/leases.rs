use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    schemas::{validate_input, value_number, BufferPreviewInput, RentPreviewInput},
    services::{
        calendar::{format_date, inclusive_days, parse_date_opt},
        rent::{
            calculate_annual_rent_from_monthly, calculate_monthly_rent_from_rate_and_area,
            resolve_base_rent_monthly,
        },
        rent_buffer::{build_billing_schedule, calculate_buffer_summary, LeaseTermInput},
    },
    state::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/leases/buffer-preview",
            axum::routing::post(preview_buffer_summary),
        )
        .route("/leases/rent-preview", axum::routing::post(preview_rent))
}

/// Local rent-buffer estimate for the lease form. A `null` summary is a normal
/// answer: the form simply has not supplied enough to compute one yet.
async fn preview_buffer_summary(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<BufferPreviewInput>,
) -> AppResult<Json<Value>> {
    validate_input(&payload)?;
    let input = lease_term_input(&payload);
    ensure_term_within_limit(&input, state.config.preview_max_term_days)?;

    let summary = calculate_buffer_summary(&input);
    tracing::debug!(
        request_id = %request_id.0,
        first_charge_date = %summary
            .as_ref()
            .map(|summary| format_date(summary.first_charge_date))
            .unwrap_or_default(),
        "Computed buffer preview"
    );

    let mut body = json!({ "data": summary });
    if payload.include_schedule {
        body["schedule"] = json!(build_billing_schedule(&input).unwrap_or_default());
    }
    Ok(Json(body))
}

async fn preview_rent(Json(payload): Json<RentPreviewInput>) -> Json<Value> {
    let explicit = value_number(payload.monthly_rent.as_ref());
    let rate = value_number(payload.rate_per_sqft_monthly.as_ref());
    let area = value_number(payload.allocated_area_sqft.as_ref());

    let base_rent_monthly = resolve_base_rent_monthly(explicit, rate, area);
    Json(json!({
        "monthly_rent_from_rate": calculate_monthly_rent_from_rate_and_area(area, rate),
        "base_rent_monthly": base_rent_monthly,
        "annual_rent": calculate_annual_rent_from_monthly(base_rent_monthly),
    }))
}

fn lease_term_input(payload: &BufferPreviewInput) -> LeaseTermInput {
    let allocated_area_sqft = value_number(payload.allocated_area_sqft.as_ref());
    LeaseTermInput {
        commencement_date: parse_date_opt(payload.starts_on.as_deref()),
        expiry_date: parse_date_opt(payload.ends_on.as_deref()),
        monthly_base_rent: resolve_base_rent_monthly(
            value_number(payload.monthly_rent.as_ref()),
            value_number(payload.rate_per_sqft_monthly.as_ref()),
            allocated_area_sqft,
        ),
        primary_buffer_days: value_number(payload.buffer_days.as_ref()).unwrap_or(0.0),
        extended_buffer_days: value_number(payload.extended_buffer_days.as_ref()).unwrap_or(0.0),
        extended_buffer_charge_percent: value_number(
            payload.extended_buffer_charge_percent.as_ref(),
        )
        .unwrap_or(0.0),
        allocated_area_sqft,
    }
}

/// Only terms the engine would actually walk are checked; an incomplete form
/// still gets a `null` summary.
fn ensure_term_within_limit(input: &LeaseTermInput, max_term_days: i64) -> AppResult<()> {
    let (Some(starts_on), Some(ends_on), Some(_)) = (
        input.commencement_date,
        input.expiry_date,
        input.monthly_base_rent.filter(|rent| *rent > 0.0),
    ) else {
        return Ok(());
    };
    if inclusive_days(starts_on, ends_on) > max_term_days {
        return Err(AppError::BadRequest(format!(
            "Lease term exceeds {max_term_days} days. Shorten the term to preview it."
        )));
    }
    Ok(())
}
