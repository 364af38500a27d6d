use super::numeric::{MAX_MONTHS, bounded_iterate, finite_or_zero, monthly_rate};
use super::sampler::PriceVariation;
use super::types::{
    BenchmarkKind, BenchmarkOutcome, DividendParams, DividendResult, MonthlySnapshot, RiskMetrics,
};

const DIVIDEND_INTERVAL_MONTHS: u32 = 3;
const MIN_PRICE: f64 = 0.01;
const MIN_VOLATILITY: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
struct Track {
    kind: BenchmarkKind,
    annual_rate: f64,
    monthly_rate: f64,
    value: f64,
}

#[derive(Debug)]
struct Holding {
    month: u32,
    price: f64,
    units: f64,
    dividend_cash: f64,
    total_dividends: f64,
    total_contributed: f64,
    last_value: f64,
    peak_value: f64,
    max_drawdown: f64,
    returns: Vec<f64>,
    tracks: Vec<Track>,
    monthly: Vec<MonthlySnapshot>,
}

impl Holding {
    fn value(&self) -> f64 {
        self.units * self.price + self.dividend_cash
    }
}

fn benchmark_tracks(params: &DividendParams, initial: f64) -> Vec<Track> {
    let inflation = finite_or_zero(params.inflation_rate);
    [
        (BenchmarkKind::DepositRate, finite_or_zero(params.deposit_rate)),
        (BenchmarkKind::Inflation, inflation),
        (
            BenchmarkKind::InflationPlusSpread,
            inflation + finite_or_zero(params.inflation_spread),
        ),
        (
            BenchmarkKind::EquityIndex,
            finite_or_zero(params.equity_index_rate),
        ),
        (
            BenchmarkKind::RealEstateIndex,
            finite_or_zero(params.real_estate_index_rate),
        ),
    ]
    .into_iter()
    .map(|(kind, annual_rate)| Track {
        kind,
        annual_rate,
        monthly_rate: monthly_rate(annual_rate),
        value: initial,
    })
    .collect()
}

pub fn simulate_dividends<V>(params: &DividendParams, variation: &mut V) -> DividendResult
where
    V: PriceVariation + ?Sized,
{
    let start_price = finite_or_zero(params.price);
    let initial = finite_or_zero(params.initial_contribution).max(0.0);
    let contribution = finite_or_zero(params.monthly_contribution).max(0.0);
    let months = params.months.min(MAX_MONTHS);

    if months < 1 || start_price <= 0.0 {
        return zero_state(params, start_price);
    }

    let yield_fraction = finite_or_zero(params.dividend_yield).max(0.0) / 100.0;
    let holding = Holding {
        month: 0,
        price: start_price,
        units: initial / start_price,
        dividend_cash: 0.0,
        total_dividends: 0.0,
        total_contributed: initial,
        last_value: initial,
        peak_value: initial,
        max_drawdown: 0.0,
        returns: Vec::with_capacity(months as usize),
        tracks: benchmark_tracks(params, initial),
        monthly: Vec::with_capacity(months as usize),
    };

    let out = bounded_iterate(
        holding,
        MAX_MONTHS,
        |h| h.month >= months,
        |h, month| {
            h.month = month;

            let shock = variation.next_variation();
            h.price = (h.price * (1.0 + shock)).max(MIN_PRICE);
            for track in &mut h.tracks {
                track.value *= 1.0 + track.monthly_rate;
            }

            if month % DIVIDEND_INTERVAL_MONTHS == 0 {
                let dividend = h.units
                    * h.price
                    * (yield_fraction / 12.0)
                    * DIVIDEND_INTERVAL_MONTHS as f64;
                h.total_dividends += dividend;
                if params.reinvest_dividends {
                    h.units += dividend / h.price;
                } else {
                    h.dividend_cash += dividend;
                }
            }

            let deposit = if month >= 2 { contribution } else { 0.0 };
            if deposit > 0.0 {
                h.units += deposit / h.price;
                h.total_contributed += deposit;
                for track in &mut h.tracks {
                    track.value += deposit;
                }
            }

            let value = h.value();
            if h.last_value > 0.0 {
                h.returns.push((value - deposit) / h.last_value - 1.0);
            }
            h.last_value = value;
            h.peak_value = h.peak_value.max(value);
            if h.peak_value > 0.0 {
                h.max_drawdown = h.max_drawdown.max((h.peak_value - value) / h.peak_value);
            }

            h.monthly.push(MonthlySnapshot {
                month,
                accumulated_value: value,
                total_contributed: h.total_contributed,
                cumulative_dividends: h.total_dividends,
            });
        },
    );

    let h = out.state;
    let final_value = h.value();
    let risk_free = params
        .risk_free_rate
        .filter(|r| r.is_finite())
        .unwrap_or_else(|| finite_or_zero(params.deposit_rate));
    let risk = risk_metrics(&h, final_value, months, yield_fraction, risk_free);

    let gain = final_value - h.total_contributed;
    let tax_on_gain = gain.max(0.0) * finite_or_zero(params.gain_tax_rate) / 100.0;

    let benchmarks = h
        .tracks
        .iter()
        .map(|t| BenchmarkOutcome {
            kind: t.kind,
            annual_rate: t.annual_rate,
            final_value: t.value,
            delta_percent: percent_delta(final_value, t.value),
        })
        .collect();

    tracing::debug!(
        months,
        final_value,
        sharpe = risk.sharpe_ratio,
        "dividend simulation finished"
    );

    DividendResult {
        months,
        final_price: h.price,
        units: h.units,
        final_value,
        after_tax_value: final_value - tax_on_gain,
        tax_on_gain,
        total_contributed: h.total_contributed,
        total_dividends: h.total_dividends,
        dividend_cash: h.dividend_cash,
        risk,
        benchmarks,
        monthly: h.monthly,
    }
}

fn risk_metrics(
    h: &Holding,
    final_value: f64,
    months: u32,
    yield_fraction: f64,
    risk_free_rate: f64,
) -> RiskMetrics {
    let volatility = annualized_volatility(&h.returns);

    let growth_factor: f64 = h.returns.iter().map(|r| 1.0 + r).product();
    let annualized_return_percent = if growth_factor > 0.0 {
        (growth_factor.powf(12.0 / months as f64) - 1.0) * 100.0
    } else {
        -100.0
    };

    let sharpe_ratio = if volatility > MIN_VOLATILITY {
        (annualized_return_percent - risk_free_rate) / volatility
    } else {
        0.0
    };

    let (total_return_percent, yield_on_cost_percent) = if h.total_contributed > 0.0 {
        (
            (final_value - h.total_contributed) / h.total_contributed * 100.0,
            h.units * h.price * yield_fraction / h.total_contributed * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    RiskMetrics {
        volatility_annualized_percent: volatility,
        sharpe_ratio,
        max_drawdown_percent: h.max_drawdown * 100.0,
        total_return_percent,
        annualized_return_percent,
        yield_on_cost_percent,
    }
}

fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt() * 12f64.sqrt() * 100.0
}

fn percent_delta(value: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (value - reference) / reference * 100.0
    } else {
        0.0
    }
}

fn zero_state(params: &DividendParams, price: f64) -> DividendResult {
    DividendResult {
        months: 0,
        final_price: price.max(0.0),
        units: 0.0,
        final_value: 0.0,
        after_tax_value: 0.0,
        tax_on_gain: 0.0,
        total_contributed: 0.0,
        total_dividends: 0.0,
        dividend_cash: 0.0,
        risk: RiskMetrics::default(),
        benchmarks: benchmark_tracks(params, 0.0)
            .into_iter()
            .map(|t| BenchmarkOutcome {
                kind: t.kind,
                annual_rate: t.annual_rate,
                final_value: 0.0,
                delta_percent: 0.0,
            })
            .collect(),
        monthly: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::{NormalVariation, SequenceVariation};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn base_params() -> DividendParams {
        DividendParams {
            price: 10.0,
            dividend_yield: 0.0,
            months: 12,
            initial_contribution: 1_000.0,
            monthly_contribution: 0.0,
            reinvest_dividends: true,
            deposit_rate: 12.0,
            inflation_rate: 0.0,
            inflation_spread: 6.0,
            ..DividendParams::default()
        }
    }

    fn benchmark(result: &DividendResult, kind: BenchmarkKind) -> BenchmarkOutcome {
        *result
            .benchmarks
            .iter()
            .find(|b| b.kind == kind)
            .expect("benchmark present")
    }

    #[test]
    fn scenario_d_seeded_runs_are_bit_identical() {
        let params = DividendParams {
            dividend_yield: 8.0,
            monthly_contribution: 500.0,
            ..base_params()
        };
        let first = simulate_dividends(&params, &mut NormalVariation::seeded(2024, 10.0, 25.0));
        let second = simulate_dividends(&params, &mut NormalVariation::seeded(2024, 10.0, 25.0));

        assert_eq!(first, second);
        assert_eq!(first.final_value.to_bits(), second.final_value.to_bits());
        assert_eq!(
            first.risk.sharpe_ratio.to_bits(),
            second.risk.sharpe_ratio.to_bits()
        );
        assert_eq!(first.monthly.len(), 12);
    }

    #[test]
    fn quarterly_dividends_are_reinvested_into_units() {
        let params = DividendParams {
            dividend_yield: 12.0,
            months: 3,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());

        assert_approx(result.total_dividends, 30.0);
        assert_approx(result.units, 103.0);
        assert_approx(result.final_value, 1_030.0);
        assert_approx(result.dividend_cash, 0.0);
        assert_approx(result.monthly[0].cumulative_dividends, 0.0);
        assert_approx(result.monthly[2].cumulative_dividends, 30.0);
    }

    #[test]
    fn dividends_accrue_as_cash_without_reinvestment() {
        let params = DividendParams {
            dividend_yield: 12.0,
            months: 3,
            reinvest_dividends: false,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());

        assert_approx(result.units, 100.0);
        assert_approx(result.dividend_cash, 30.0);
        assert_approx(result.final_value, 1_030.0);
        assert_approx(result.tax_on_gain, 30.0 * 0.15);
        assert_approx(result.after_tax_value, 1_030.0 - 4.5);
        assert_approx(result.risk.yield_on_cost_percent, 12.0);
    }

    #[test]
    fn contributions_start_in_second_month() {
        let params = DividendParams {
            months: 3,
            monthly_contribution: 100.0,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());

        assert_approx(result.total_contributed, 1_200.0);
        assert_approx(result.monthly[0].total_contributed, 1_000.0);
        assert_approx(result.monthly[1].total_contributed, 1_100.0);
        assert_approx(result.final_value, 1_200.0);
    }

    #[test]
    fn flat_price_has_zero_volatility_and_sentinel_sharpe() {
        let params = DividendParams {
            monthly_contribution: 250.0,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());

        assert_approx(result.risk.volatility_annualized_percent, 0.0);
        assert_approx(result.risk.sharpe_ratio, 0.0);
        assert_approx(result.risk.max_drawdown_percent, 0.0);
        assert_approx(result.risk.annualized_return_percent, 0.0);
        assert_approx(result.tax_on_gain, 0.0);
    }

    #[test]
    fn drawdown_tracks_peak_to_trough() {
        let params = DividendParams {
            months: 3,
            ..base_params()
        };
        let mut source = SequenceVariation::new(vec![0.10, -0.50, 0.0]);
        let result = simulate_dividends(&params, &mut source);

        assert_approx(result.risk.max_drawdown_percent, 50.0);
        assert_approx(result.final_value, 550.0);
        assert!(result.risk.volatility_annualized_percent > 0.0);
        assert!(result.risk.sharpe_ratio < 0.0);
    }

    #[test]
    fn annualized_return_uses_time_weighted_growth() {
        let params = base_params();
        let mut source = SequenceVariation::constant(monthly_rate(20.0));
        let result = simulate_dividends(&params, &mut source);

        assert_approx(result.risk.annualized_return_percent, 20.0);
        assert_approx(result.risk.total_return_percent, 20.0);
        assert_approx(result.final_value, 1_200.0);
    }

    #[test]
    fn benchmark_tracks_grow_at_fixed_rates() {
        let params = DividendParams {
            inflation_rate: 4.0,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());

        assert_eq!(result.benchmarks.len(), 5);
        assert_approx(benchmark(&result, BenchmarkKind::DepositRate).final_value, 1_120.0);
        assert_approx(benchmark(&result, BenchmarkKind::Inflation).final_value, 1_040.0);
        assert_approx(
            benchmark(&result, BenchmarkKind::InflationPlusSpread).final_value,
            1_100.0,
        );
        assert_approx(benchmark(&result, BenchmarkKind::EquityIndex).final_value, 1_120.0);
        assert_approx(
            benchmark(&result, BenchmarkKind::RealEstateIndex).final_value,
            1_100.0,
        );
        assert_approx(
            benchmark(&result, BenchmarkKind::Inflation).delta_percent,
            (1_000.0 - 1_040.0) / 1_040.0 * 100.0,
        );
    }

    #[test]
    fn zero_horizon_returns_zero_state() {
        let params = DividendParams {
            months: 0,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());
        assert_eq!(result.months, 0);
        assert!(result.monthly.is_empty());
        assert_approx(result.final_value, 0.0);
        assert_eq!(result.risk, RiskMetrics::default());
        assert!(result.benchmarks.iter().all(|b| b.final_value == 0.0));
    }

    #[test]
    fn non_positive_price_returns_zero_state() {
        let params = DividendParams {
            price: f64::NAN,
            ..base_params()
        };
        let result = simulate_dividends(&params, &mut SequenceVariation::default());
        assert_eq!(result.months, 0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_outputs_are_finite_and_bounded(
            seed in proptest::num::u64::ANY,
            months in 0u32..700,
            yield_bp in 0u32..2000,
            vol_bp in 0u32..6000,
            contribution in 0u32..5_000,
            reinvest in proptest::bool::ANY
        ) {
            let params = DividendParams {
                dividend_yield: yield_bp as f64 / 100.0,
                months,
                monthly_contribution: contribution as f64,
                reinvest_dividends: reinvest,
                ..base_params()
            };
            let mut source = NormalVariation::seeded(seed, 8.0, vol_bp as f64 / 100.0);
            let result = simulate_dividends(&params, &mut source);

            prop_assert!(result.months <= MAX_MONTHS);
            prop_assert_eq!(result.monthly.len(), result.months as usize);
            prop_assert!(result.final_value.is_finite());
            prop_assert!(result.risk.sharpe_ratio.is_finite());
            prop_assert!(result.risk.max_drawdown_percent >= 0.0);
            prop_assert!(result.risk.max_drawdown_percent <= 100.0);
            prop_assert!(result.after_tax_value <= result.final_value + 1e-9);
        }
    }
}
