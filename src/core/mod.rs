mod dividend;
mod fire;
mod fixed_income;
mod growth;
mod numeric;
mod sampler;
mod types;

pub use dividend::simulate_dividends;
pub use fire::{
    SAFE_WITHDRAWAL_RATE, SolverOutcome, TRADITIONAL_MULTIPLE, calculate_fire,
    solve_time_to_target,
};
pub use fixed_income::{
    DEFAULT_INFLATION_RATE, PRICE_INDEX_BASELINE, effective_annual_rate, simulate_fixed_income,
    simulate_fixed_income_with_schedule,
};
pub use growth::{MAX_YEARS, MIN_YEARS, simulate_growth};
pub use numeric::{
    Iteration, MAX_MONTHS, TaxBracket, TaxSchedule, bounded_iterate, finite_or_zero,
    monthly_rate, tax_bracket,
};
pub use sampler::{NormalVariation, PriceVariation, SequenceVariation};
pub use types::{
    BenchmarkKind, BenchmarkOutcome, DividendParams, DividendResult, FireExtra, FireParams,
    FireTargetResult, FireVariant, FireYearSnapshot, FixedIncomeParams, FixedIncomeResult,
    GrowthParams, GrowthResult, IndexType, MonthlySnapshot, RiskMetrics,
};
