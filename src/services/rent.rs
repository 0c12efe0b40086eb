/// Round to cents. `f64::round` goes half away from zero, which is half-up
/// for the non-negative amounts produced here.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|amount| amount.is_finite())
}

fn positive(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|amount| *amount > 0.0)
}

/// `area * rate` in cents, or `None` when either side is missing.
pub fn calculate_monthly_rent_from_rate_and_area(
    area: Option<f64>,
    rate_per_area_monthly: Option<f64>,
) -> Option<f64> {
    let area = finite(area)?;
    let rate = finite(rate_per_area_monthly)?;
    Some(round2(area * rate))
}

/// Prefer the live `rate * area` figure over a manually entered monthly rent.
/// Zero or negative rate/area fall back to the explicit amount.
pub fn resolve_base_rent_monthly(
    explicit_monthly_rent: Option<f64>,
    rate_per_area_monthly: Option<f64>,
    total_allocated_area: Option<f64>,
) -> Option<f64> {
    match (
        positive(rate_per_area_monthly),
        positive(total_allocated_area),
    ) {
        (Some(rate), Some(area)) => calculate_monthly_rent_from_rate_and_area(Some(area), Some(rate)),
        _ => finite(explicit_monthly_rent),
    }
}

pub fn calculate_annual_rent_from_monthly(monthly: Option<f64>) -> Option<f64> {
    finite(monthly).map(|amount| round2(amount * 12.0))
}
