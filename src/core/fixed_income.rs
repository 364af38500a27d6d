use super::numeric::{MAX_MONTHS, TaxSchedule, finite_or_zero, monthly_rate};
use super::types::{FixedIncomeParams, FixedIncomeResult, IndexType, MonthlySnapshot};

pub const DEFAULT_INFLATION_RATE: f64 = 4.5;
pub const PRICE_INDEX_BASELINE: f64 = 4.0;

const SNAPSHOT_INTERVAL_MONTHS: u32 = 6;

pub fn effective_annual_rate(params: &FixedIncomeParams) -> f64 {
    let nominal = finite_or_zero(params.nominal_rate);
    let benchmark = finite_or_zero(params.benchmark_rate);
    match params.index_type {
        IndexType::PercentOfBenchmark => nominal / 100.0 * benchmark,
        IndexType::BenchmarkPlusSpread => benchmark + nominal,
        IndexType::InflationPlusSpread => {
            let inflation = params
                .inflation_rate
                .filter(|r| r.is_finite())
                .unwrap_or(DEFAULT_INFLATION_RATE);
            inflation + nominal
        }
        IndexType::Fixed => nominal,
        IndexType::PriceIndexPlusSpread => PRICE_INDEX_BASELINE + nominal,
    }
}

pub fn simulate_fixed_income(params: &FixedIncomeParams) -> FixedIncomeResult {
    simulate_fixed_income_with_schedule(params, &TaxSchedule::regressive())
}

pub fn simulate_fixed_income_with_schedule(
    params: &FixedIncomeParams,
    schedule: &TaxSchedule,
) -> FixedIncomeResult {
    let principal = finite_or_zero(params.principal);
    let months = params.holding_months.clamp(1, MAX_MONTHS);
    let annual_rate = effective_annual_rate(params);
    let rate = monthly_rate(annual_rate);

    let mut balance = principal;
    let mut snapshots = Vec::with_capacity((months / SNAPSHOT_INTERVAL_MONTHS + 1) as usize);
    for month in 1..=months {
        balance *= 1.0 + rate;
        if month % SNAPSHOT_INTERVAL_MONTHS == 0 || month == months {
            snapshots.push(MonthlySnapshot {
                month,
                accumulated_value: balance,
                total_contributed: principal,
                cumulative_dividends: balance - principal,
            });
        }
    }

    let gross_gain = balance - principal;
    let tax_rate_percent = if params.tax_exempt {
        0.0
    } else {
        schedule.rate_for(months)
    };
    let tax_amount = gross_gain.max(0.0) * tax_rate_percent / 100.0;
    let net_final_balance = balance - tax_amount;
    let net_gain = net_final_balance - principal;

    let net_annual_rate = if principal > 0.0 && net_final_balance > 0.0 {
        ((net_final_balance / principal).powf(12.0 / months as f64) - 1.0) * 100.0
    } else {
        0.0
    };

    tracing::debug!(
        index_type = ?params.index_type,
        annual_rate,
        months,
        tax_rate_percent,
        "fixed income simulation finished"
    );

    FixedIncomeResult {
        index_type: params.index_type,
        holding_months: months,
        principal,
        effective_annual_rate: annual_rate,
        gross_final_balance: balance,
        gross_gain,
        tax_rate_percent,
        tax_amount,
        net_final_balance,
        net_gain,
        net_annual_rate,
        snapshots,
    }
}
