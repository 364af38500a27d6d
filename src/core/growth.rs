use super::numeric::{finite_or_zero, monthly_rate};
use super::types::{GrowthParams, GrowthResult, MonthlySnapshot};

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 30;

pub fn simulate_growth(params: &GrowthParams) -> GrowthResult {
    let years = params.years.clamp(MIN_YEARS, MAX_YEARS);
    let months = years * 12;

    let initial = finite_or_zero(params.initial_value);
    let contribution = finite_or_zero(params.monthly_contribution);
    let growth = monthly_rate(params.annual_growth_rate);
    let dividend_rate = monthly_rate(params.annual_dividend_yield);

    let mut value = initial;
    let mut total_contributed = initial;
    let mut total_dividends = 0.0;
    let mut dividend_cash = 0.0;

    let mut monthly = Vec::with_capacity(months as usize);
    let mut yearly = Vec::with_capacity(years as usize);

    for month in 1..=months {
        value *= 1.0 + growth;

        let dividend = value * dividend_rate;
        total_dividends += dividend;
        if params.reinvest_dividends {
            value += dividend;
        } else {
            dividend_cash += dividend;
        }

        value += contribution;
        total_contributed += contribution;

        let snapshot = MonthlySnapshot {
            month,
            accumulated_value: value,
            total_contributed,
            cumulative_dividends: total_dividends,
        };
        monthly.push(snapshot);
        if month % 12 == 0 || month == months {
            yearly.push(snapshot);
        }
    }

    let inflation_factor = (1.0 + finite_or_zero(params.annual_inflation_rate) / 100.0)
        .max(f64::MIN_POSITIVE)
        .powi(years as i32);

    tracing::debug!(years, final_value = value, "growth simulation finished");

    GrowthResult {
        years,
        final_value: value,
        total_contributed,
        total_dividends,
        dividend_cash,
        total_growth: value - total_contributed,
        monthly_dividend_income: value * dividend_rate,
        real_final_value: value / inflation_factor,
        monthly,
        yearly,
    }
}
