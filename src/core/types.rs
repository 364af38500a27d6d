use serde::Serialize;

// One point of a simulated time series. `cumulative_dividends` carries the
// income credited so far (dividends, or accrued interest for fixed income).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: u32,
    pub accumulated_value: f64,
    pub total_contributed: f64,
    pub cumulative_dividends: f64,
}

#[derive(Debug, Clone)]
pub struct GrowthParams {
    pub initial_value: f64,
    pub monthly_contribution: f64,
    pub annual_growth_rate: f64,
    pub annual_dividend_yield: f64,
    pub years: u32,
    pub reinvest_dividends: bool,
    pub annual_inflation_rate: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            initial_value: 0.0,
            monthly_contribution: 0.0,
            annual_growth_rate: 0.0,
            annual_dividend_yield: 0.0,
            years: 1,
            reinvest_dividends: true,
            annual_inflation_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub years: u32,
    pub final_value: f64,
    pub total_contributed: f64,
    pub total_dividends: f64,
    pub dividend_cash: f64,
    pub total_growth: f64,
    pub monthly_dividend_income: f64,
    pub real_final_value: f64,
    pub monthly: Vec<MonthlySnapshot>,
    pub yearly: Vec<MonthlySnapshot>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexType {
    PercentOfBenchmark,
    BenchmarkPlusSpread,
    InflationPlusSpread,
    Fixed,
    PriceIndexPlusSpread,
}

#[derive(Debug, Clone)]
pub struct FixedIncomeParams {
    pub principal: f64,
    pub nominal_rate: f64,
    pub holding_months: u32,
    pub index_type: IndexType,
    pub benchmark_rate: f64,
    pub inflation_rate: Option<f64>,
    pub tax_exempt: bool,
}

impl Default for FixedIncomeParams {
    fn default() -> Self {
        Self {
            principal: 0.0,
            nominal_rate: 0.0,
            holding_months: 1,
            index_type: IndexType::PercentOfBenchmark,
            benchmark_rate: 0.0,
            inflation_rate: None,
            tax_exempt: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedIncomeResult {
    pub index_type: IndexType,
    pub holding_months: u32,
    pub principal: f64,
    pub effective_annual_rate: f64,
    pub gross_final_balance: f64,
    pub gross_gain: f64,
    pub tax_rate_percent: f64,
    pub tax_amount: f64,
    pub net_final_balance: f64,
    pub net_gain: f64,
    pub net_annual_rate: f64,
    pub snapshots: Vec<MonthlySnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FireVariant {
    Traditional {
        monthly_expenses: f64,
        monthly_contribution: f64,
    },
    Lean {
        monthly_income: f64,
        lean_monthly_expenses: f64,
    },
    Fat {
        desired_monthly_expenses: f64,
        multiplier: f64,
        monthly_contribution: f64,
    },
    Coast {
        monthly_expenses_at_retirement: f64,
        retirement_age: u32,
        monthly_contribution: f64,
    },
    Barista {
        monthly_expenses: f64,
        coverage_percent: f64,
        hourly_wage: f64,
        monthly_contribution: f64,
    },
    GeoArbitrage {
        monthly_expenses: f64,
        origin_cost_index: f64,
        destination_cost_index: f64,
        monthly_contribution: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireParams {
    pub current_age: u32,
    pub current_wealth: f64,
    pub annual_growth_rate: f64,
    pub variant: FireVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireYearSnapshot {
    pub year: u32,
    pub patrimony: f64,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum FireExtra {
    Traditional {
        monthly_passive_income: f64,
    },
    Lean {
        monthly_contribution: f64,
        savings_rate_percent: f64,
    },
    Fat {
        multiplier: f64,
        safety_buffer: f64,
    },
    Coast {
        coast_number: f64,
        additional_needed_today: f64,
        is_coasting: bool,
        coast_age: Option<f64>,
        years_to_retirement: u32,
    },
    Barista {
        coverage_percent: f64,
        income_gap: f64,
        required_weekly_hours: f64,
    },
    GeoArbitrage {
        cost_ratio: f64,
        adjusted_monthly_expenses: f64,
        purchasing_power_gain_percent: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireTargetResult {
    pub target_amount: f64,
    pub monthly_contribution: f64,
    pub months_to_target: u32,
    pub years_to_target: u32,
    pub age_at_target: u32,
    pub reached: bool,
    pub final_patrimony: f64,
    pub monthly_passive_income_at_target: f64,
    pub total_contributed: f64,
    pub total_growth: f64,
    pub progress_percent: f64,
    pub yearly: Vec<FireYearSnapshot>,
    pub extra: FireExtra,
}

#[derive(Debug, Clone)]
pub struct DividendParams {
    pub price: f64,
    pub dividend_yield: f64,
    pub months: u32,
    pub initial_contribution: f64,
    pub monthly_contribution: f64,
    pub reinvest_dividends: bool,
    pub deposit_rate: f64,
    pub inflation_rate: f64,
    pub inflation_spread: f64,
    pub equity_index_rate: f64,
    pub real_estate_index_rate: f64,
    pub risk_free_rate: Option<f64>,
    pub gain_tax_rate: f64,
}

impl Default for DividendParams {
    fn default() -> Self {
        Self {
            price: 0.0,
            dividend_yield: 0.0,
            months: 12,
            initial_contribution: 0.0,
            monthly_contribution: 0.0,
            reinvest_dividends: true,
            deposit_rate: 0.0,
            inflation_rate: 0.0,
            inflation_spread: 0.0,
            equity_index_rate: 12.0,
            real_estate_index_rate: 10.0,
            risk_free_rate: None,
            gain_tax_rate: 15.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BenchmarkKind {
    DepositRate,
    Inflation,
    InflationPlusSpread,
    EquityIndex,
    RealEstateIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkOutcome {
    pub kind: BenchmarkKind,
    pub annual_rate: f64,
    pub final_value: f64,
    pub delta_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub volatility_annualized_percent: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_percent: f64,
    pub total_return_percent: f64,
    pub annualized_return_percent: f64,
    pub yield_on_cost_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendResult {
    pub months: u32,
    pub final_price: f64,
    pub units: f64,
    pub final_value: f64,
    pub after_tax_value: f64,
    pub tax_on_gain: f64,
    pub total_contributed: f64,
    pub total_dividends: f64,
    pub dividend_cash: f64,
    pub risk: RiskMetrics,
    pub benchmarks: Vec<BenchmarkOutcome>,
    pub monthly: Vec<MonthlySnapshot>,
}
