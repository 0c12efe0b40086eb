use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::services::{
    calendar::{add_days, add_years, clip_to, day_offset, days_in_month, end_of_month, inclusive_days},
    rent::round2,
};

/// Upper bound for a normalized buffer length (100 years).
pub const MAX_BUFFER_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargePhase {
    PrimaryBuffer,
    ExtendedBuffer,
    Normal,
}

/// Phase and charge fraction for the day `day_offset` days after commencement.
pub fn classify_day(
    day_offset: i64,
    primary_days: i64,
    extended_days: i64,
    extended_percent: f64,
) -> (ChargePhase, f64) {
    if day_offset < primary_days {
        (ChargePhase::PrimaryBuffer, 0.0)
    } else if day_offset < primary_days.saturating_add(extended_days) {
        (ChargePhase::ExtendedBuffer, extended_percent / 100.0)
    } else {
        (ChargePhase::Normal, 1.0)
    }
}

/// Buffer parameters after truncation and clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferTerms {
    pub primary_days: i64,
    pub extended_days: i64,
    pub extended_percent: f64,
}

impl BufferTerms {
    pub fn normalized(primary_days: f64, extended_days: f64, extended_percent: f64) -> Self {
        Self {
            primary_days: normalize_days(primary_days),
            extended_days: normalize_days(extended_days),
            extended_percent: normalize_percent(extended_percent),
        }
    }

    pub fn classify(&self, day_offset: i64) -> (ChargePhase, f64) {
        classify_day(
            day_offset,
            self.primary_days,
            self.extended_days,
            self.extended_percent,
        )
    }

    fn full_charge_offset(&self) -> i64 {
        self.primary_days + self.extended_days
    }
}

fn normalize_days(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value.trunc() as i64).clamp(0, MAX_BUFFER_DAYS)
}

fn normalize_percent(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChargeWindowTotals {
    pub gross: f64,
    pub charged: f64,
    pub primary_concession: f64,
    pub extended_concession: f64,
}

impl ChargeWindowTotals {
    pub fn total_concession(&self) -> f64 {
        round2(self.primary_concession + self.extended_concession)
    }
}

/// Walk `[start, end]` one day at a time, prorating `monthly_base_rent` by the
/// length of each day's own month. Totals are rounded once, after the walk.
pub fn sum_daily_charges(
    start: NaiveDate,
    end: NaiveDate,
    monthly_base_rent: f64,
    commencement: NaiveDate,
    terms: &BufferTerms,
) -> ChargeWindowTotals {
    if end < start {
        return ChargeWindowTotals::default();
    }

    let mut gross = 0.0;
    let mut charged = 0.0;
    let mut primary_concession = 0.0;
    let mut extended_concession = 0.0;

    for day in start.iter_days().take_while(|day| *day <= end) {
        let daily_base = monthly_base_rent / f64::from(days_in_month(day));
        let (phase, fraction) = terms.classify(day_offset(day, commencement));
        let daily_charged = daily_base * fraction;

        gross += daily_base;
        charged += daily_charged;
        match phase {
            ChargePhase::PrimaryBuffer => primary_concession += daily_base,
            ChargePhase::ExtendedBuffer => extended_concession += daily_base - daily_charged,
            ChargePhase::Normal => {}
        }
    }

    ChargeWindowTotals {
        gross: round2(gross),
        charged: round2(charged),
        primary_concession: round2(primary_concession),
        extended_concession: round2(extended_concession),
    }
}

/// Caller-supplied lease terms. Dates that failed to parse arrive as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaseTermInput {
    pub commencement_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub monthly_base_rent: Option<f64>,
    pub primary_buffer_days: f64,
    pub extended_buffer_days: f64,
    pub extended_buffer_charge_percent: f64,
    pub allocated_area_sqft: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferSummary {
    pub monthly_base_rent: f64,
    pub current_daily_base_rent: f64,
    pub primary_buffer_days: i64,
    pub extended_buffer_days: i64,
    pub extended_buffer_charge_percent: f64,

    pub commencement_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub term_is_open_ended: bool,
    pub primary_buffer_start_date: Option<NaiveDate>,
    pub primary_buffer_end_date: Option<NaiveDate>,
    pub extended_buffer_start_date: Option<NaiveDate>,
    pub extended_buffer_end_date: Option<NaiveDate>,
    pub first_charge_date: NaiveDate,
    pub full_charge_date: NaiveDate,

    pub annual_range_end_date: NaiveDate,
    pub annual_gross_rent: f64,
    pub annual_net_collectible: f64,
    pub annual_primary_buffer_concession: f64,
    pub annual_extended_buffer_concession: f64,
    pub annual_total_concession: f64,

    pub term_range_end_date: NaiveDate,
    pub term_gross_rent: f64,
    pub term_net_collectible: f64,
    pub term_primary_buffer_concession: f64,
    pub term_extended_buffer_concession: f64,
    pub term_total_concession: f64,

    pub first_invoice_start_date: Option<NaiveDate>,
    pub first_invoice_end_date: Option<NaiveDate>,
    pub first_invoice_amount: f64,
    pub next_cycle_start_date: Option<NaiveDate>,
    pub next_cycle_end_date: Option<NaiveDate>,
    pub next_cycle_amount: f64,

    pub effective_monthly_rent: f64,
    pub effective_rate_per_sqft: Option<f64>,
}

/// One calendar-month slice of the term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingCycle {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub days: i64,
    pub closing_phase: ChargePhase,
    #[serde(flatten)]
    pub totals: ChargeWindowTotals,
}

/// Validated, normalized view of a [`LeaseTermInput`].
struct ResolvedTerm {
    commencement: NaiveDate,
    expiry: Option<NaiveDate>,
    monthly_base_rent: f64,
    terms: BufferTerms,
}

impl ResolvedTerm {
    fn from_input(input: &LeaseTermInput) -> Option<Self> {
        let Some(commencement) = input.commencement_date else {
            debug!("buffer summary skipped: missing commencement date");
            return None;
        };
        let Some(monthly_base_rent) = input
            .monthly_base_rent
            .filter(|rent| rent.is_finite() && *rent > 0.0)
        else {
            debug!(
                monthly_base_rent = ?input.monthly_base_rent,
                "buffer summary skipped: monthly rent missing or not positive"
            );
            return None;
        };

        Some(Self {
            commencement,
            expiry: input.expiry_date,
            monthly_base_rent,
            terms: BufferTerms::normalized(
                input.primary_buffer_days,
                input.extended_buffer_days,
                input.extended_buffer_charge_percent,
            ),
        })
    }

    /// A Feb 29 commencement clamps to Feb 28 before the minus-one-day step,
    /// so that first year is one day short (365 days).
    fn first_year_end(&self) -> NaiveDate {
        add_days(add_years(self.commencement, 1), -1)
    }

    fn annual_range_end(&self) -> NaiveDate {
        clip_to(self.first_year_end(), self.expiry)
    }

    /// Open-ended leases are summarized over their first year.
    fn term_range_end(&self) -> NaiveDate {
        self.expiry.unwrap_or_else(|| self.first_year_end())
    }

    fn sum(&self, start: NaiveDate, end: NaiveDate) -> ChargeWindowTotals {
        sum_daily_charges(
            start,
            end,
            self.monthly_base_rent,
            self.commencement,
            &self.terms,
        )
    }
}

fn non_empty_window(start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    (end >= start).then_some((start, end))
}

pub fn calculate_buffer_summary(input: &LeaseTermInput) -> Option<BufferSummary> {
    let term = ResolvedTerm::from_input(input)?;
    let commencement = term.commencement;
    let terms = term.terms;

    let (primary_buffer_start_date, primary_buffer_end_date) = if terms.primary_days > 0 {
        (
            Some(commencement),
            Some(add_days(commencement, terms.primary_days - 1)),
        )
    } else {
        (None, None)
    };
    let (extended_buffer_start_date, extended_buffer_end_date) = if terms.extended_days > 0 {
        (
            Some(add_days(commencement, terms.primary_days)),
            Some(add_days(commencement, terms.full_charge_offset() - 1)),
        )
    } else {
        (None, None)
    };
    let first_charge_date = add_days(commencement, terms.primary_days);
    let full_charge_date = add_days(commencement, terms.full_charge_offset());

    let annual_range_end_date = term.annual_range_end();
    let annual = term.sum(commencement, annual_range_end_date);

    let term_range_end_date = term.term_range_end();
    let full_term = term.sum(commencement, term_range_end_date);

    let first_invoice_month_end = end_of_month(first_charge_date);
    let first_invoice_window = non_empty_window(
        first_charge_date,
        clip_to(first_invoice_month_end, term.expiry),
    );
    let first_invoice_amount = first_invoice_window
        .map(|(start, end)| term.sum(start, end).charged)
        .unwrap_or(0.0);

    let next_cycle_start = add_days(first_invoice_month_end, 1);
    let next_cycle_window = non_empty_window(
        next_cycle_start,
        clip_to(end_of_month(next_cycle_start), term.expiry),
    );
    let next_cycle_amount = next_cycle_window
        .map(|(start, end)| term.sum(start, end).charged)
        .unwrap_or(0.0);

    let effective_monthly_rent = round2(annual.charged / 12.0);
    let effective_rate_per_sqft = input
        .allocated_area_sqft
        .filter(|area| area.is_finite() && *area > 0.0)
        .map(|area| round2(effective_monthly_rent / area));

    Some(BufferSummary {
        monthly_base_rent: term.monthly_base_rent,
        current_daily_base_rent: round2(
            term.monthly_base_rent / f64::from(days_in_month(commencement)),
        ),
        primary_buffer_days: terms.primary_days,
        extended_buffer_days: terms.extended_days,
        extended_buffer_charge_percent: terms.extended_percent,
        commencement_date: commencement,
        expiry_date: term.expiry,
        term_is_open_ended: term.expiry.is_none(),
        primary_buffer_start_date,
        primary_buffer_end_date,
        extended_buffer_start_date,
        extended_buffer_end_date,
        first_charge_date,
        full_charge_date,
        annual_range_end_date,
        annual_gross_rent: annual.gross,
        annual_net_collectible: annual.charged,
        annual_primary_buffer_concession: annual.primary_concession,
        annual_extended_buffer_concession: annual.extended_concession,
        annual_total_concession: annual.total_concession(),
        term_range_end_date,
        term_gross_rent: full_term.gross,
        term_net_collectible: full_term.charged,
        term_primary_buffer_concession: full_term.primary_concession,
        term_extended_buffer_concession: full_term.extended_concession,
        term_total_concession: full_term.total_concession(),
        first_invoice_start_date: first_invoice_window.map(|(start, _)| start),
        first_invoice_end_date: first_invoice_window.map(|(_, end)| end),
        first_invoice_amount,
        next_cycle_start_date: next_cycle_window.map(|(start, _)| start),
        next_cycle_end_date: next_cycle_window.map(|(_, end)| end),
        next_cycle_amount,
        effective_monthly_rent,
        effective_rate_per_sqft,
    })
}

/// Calendar-month billing cycles over the same window as the term totals.
pub fn build_billing_schedule(input: &LeaseTermInput) -> Option<Vec<BillingCycle>> {
    let term = ResolvedTerm::from_input(input)?;
    let end = term.term_range_end();

    let mut cycles = Vec::new();
    let mut cursor = term.commencement;
    while cursor <= end {
        let period_end = end_of_month(cursor).min(end);
        let (closing_phase, _) = term
            .terms
            .classify(day_offset(period_end, term.commencement));
        cycles.push(BillingCycle {
            period_start: cursor,
            period_end,
            days: inclusive_days(cursor, period_end),
            closing_phase,
            totals: term.sum(cursor, period_end),
        });
        match period_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    Some(cycles)
}
