use super::numeric::{MAX_MONTHS, bounded_iterate, finite_or_zero, monthly_rate};
use super::types::{FireExtra, FireParams, FireTargetResult, FireVariant, FireYearSnapshot};

pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;
pub const TRADITIONAL_MULTIPLE: f64 = 25.0;
pub const LEAN_MULTIPLE: f64 = 20.0;
pub const FAT_MULTIPLE_MIN: f64 = 25.0;
pub const FAT_MULTIPLE_MAX: f64 = 50.0;
const WEEKS_PER_MONTH: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub months: u32,
    pub reached: bool,
    pub final_patrimony: f64,
    pub total_contributed: f64,
    pub yearly: Vec<FireYearSnapshot>,
}

#[derive(Debug)]
struct SolverState {
    month: u32,
    patrimony: f64,
    contributed: f64,
    yearly: Vec<FireYearSnapshot>,
}

pub fn solve_time_to_target<T>(
    start: f64,
    contribution: f64,
    annual_growth_rate: f64,
    target_at: T,
) -> SolverOutcome
where
    T: Fn(u32) -> f64,
{
    let rate = monthly_rate(annual_growth_rate);
    let initial = SolverState {
        month: 0,
        patrimony: start,
        contributed: start,
        yearly: Vec::new(),
    };

    let mut out = bounded_iterate(
        initial,
        MAX_MONTHS,
        |s| s.patrimony >= target_at(s.month),
        |s, month| {
            s.month = month;
            s.patrimony = s.patrimony * (1.0 + rate) + contribution;
            s.contributed += contribution;
            if month % 12 == 0 {
                s.yearly.push(FireYearSnapshot {
                    year: month / 12,
                    patrimony: s.patrimony,
                    target: target_at(month),
                });
            }
        },
    );

    let state = &mut out.state;
    if state.month % 12 != 0 {
        state.yearly.push(FireYearSnapshot {
            year: state.month.div_ceil(12),
            patrimony: state.patrimony,
            target: target_at(state.month),
        });
    }

    if !out.reached {
        tracing::debug!(
            months = out.iterations,
            patrimony = out.state.patrimony,
            "target not reached within iteration bound"
        );
    }

    SolverOutcome {
        months: out.iterations,
        reached: out.reached,
        final_patrimony: out.state.patrimony,
        total_contributed: out.state.contributed,
        yearly: out.state.yearly,
    }
}

struct Plan {
    target: f64,
    retirement_target: f64,
    contribution: f64,
    extra: FireExtra,
}

pub fn calculate_fire(params: &FireParams) -> FireTargetResult {
    let wealth = finite_or_zero(params.current_wealth);
    let growth = finite_or_zero(params.annual_growth_rate);
    let plan = plan_variant(params, wealth, growth);

    let solved = match &params.variant {
        // Without a contribution the discounted target grows with wealth, so
        // a non-coasting start is only met after retirement, if at all.
        FireVariant::Coast { retirement_age, .. } => {
            let horizon = retirement_age
                .saturating_sub(params.current_age)
                .saturating_mul(12);
            let retirement_target = plan.retirement_target;
            solve_time_to_target(wealth, plan.contribution, growth, move |month| {
                discount(retirement_target, growth, horizon.saturating_sub(month))
            })
        }
        _ => {
            let target = plan.target;
            solve_time_to_target(wealth, plan.contribution, growth, move |_| target)
        }
    };

    let extra = match plan.extra {
        FireExtra::Coast {
            coast_number,
            additional_needed_today,
            is_coasting,
            years_to_retirement,
            ..
        } => {
            let coasted_in_time = solved.months <= years_to_retirement.saturating_mul(12);
            let coast_age = (solved.reached && coasted_in_time)
                .then(|| params.current_age as f64 + solved.months as f64 / 12.0);
            FireExtra::Coast {
                coast_number,
                additional_needed_today,
                is_coasting,
                coast_age,
                years_to_retirement,
            }
        }
        other => other,
    };

    let progress_percent = if plan.target <= 0.0 || wealth >= plan.target {
        100.0
    } else {
        (wealth.max(0.0) / plan.target * 100.0).min(100.0)
    };
    let months_to_target = solved.months.min(MAX_MONTHS);
    let years_to_target = months_to_target.div_ceil(12);

    tracing::debug!(
        target = plan.target,
        months_to_target,
        reached = solved.reached,
        "fire target solved"
    );

    FireTargetResult {
        target_amount: plan.target,
        monthly_contribution: plan.contribution,
        months_to_target,
        years_to_target,
        age_at_target: params.current_age.saturating_add(years_to_target),
        reached: solved.reached,
        final_patrimony: solved.final_patrimony,
        monthly_passive_income_at_target: plan.retirement_target * SAFE_WITHDRAWAL_RATE / 12.0,
        total_contributed: solved.total_contributed,
        total_growth: solved.final_patrimony - solved.total_contributed,
        progress_percent,
        yearly: solved.yearly,
        extra,
    }
}

fn plan_variant(params: &FireParams, wealth: f64, growth: f64) -> Plan {
    match params.variant {
        FireVariant::Traditional {
            monthly_expenses,
            monthly_contribution,
        } => {
            let target = finite_or_zero(monthly_expenses) * 12.0 * TRADITIONAL_MULTIPLE;
            Plan {
                target,
                retirement_target: target,
                contribution: finite_or_zero(monthly_contribution),
                extra: FireExtra::Traditional {
                    monthly_passive_income: target * SAFE_WITHDRAWAL_RATE / 12.0,
                },
            }
        }
        FireVariant::Lean {
            monthly_income,
            lean_monthly_expenses,
        } => {
            let income = finite_or_zero(monthly_income);
            let expenses = finite_or_zero(lean_monthly_expenses);
            let target = expenses * 12.0 * LEAN_MULTIPLE;
            let contribution = (income - expenses).max(0.0);
            let savings_rate_percent = if income > 0.0 {
                contribution / income * 100.0
            } else {
                0.0
            };
            Plan {
                target,
                retirement_target: target,
                contribution,
                extra: FireExtra::Lean {
                    monthly_contribution: contribution,
                    savings_rate_percent,
                },
            }
        }
        FireVariant::Fat {
            desired_monthly_expenses,
            multiplier,
            monthly_contribution,
        } => {
            let expenses = finite_or_zero(desired_monthly_expenses);
            let multiplier = finite_or_zero(multiplier).clamp(FAT_MULTIPLE_MIN, FAT_MULTIPLE_MAX);
            let target = expenses * 12.0 * multiplier;
            Plan {
                target,
                retirement_target: target,
                contribution: finite_or_zero(monthly_contribution),
                extra: FireExtra::Fat {
                    multiplier,
                    safety_buffer: target - expenses * 12.0 * TRADITIONAL_MULTIPLE,
                },
            }
        }
        FireVariant::Coast {
            monthly_expenses_at_retirement,
            retirement_age,
            monthly_contribution,
        } => {
            let retirement_target =
                finite_or_zero(monthly_expenses_at_retirement) * 12.0 * TRADITIONAL_MULTIPLE;
            let years_to_retirement = retirement_age.saturating_sub(params.current_age);
            let coast_number =
                discount(retirement_target, growth, years_to_retirement.saturating_mul(12));
            Plan {
                target: coast_number,
                retirement_target,
                contribution: finite_or_zero(monthly_contribution),
                extra: FireExtra::Coast {
                    coast_number,
                    additional_needed_today: (coast_number - wealth).max(0.0),
                    is_coasting: wealth >= coast_number,
                    coast_age: None,
                    years_to_retirement,
                },
            }
        }
        FireVariant::Barista {
            monthly_expenses,
            coverage_percent,
            hourly_wage,
            monthly_contribution,
        } => {
            let expenses = finite_or_zero(monthly_expenses);
            let coverage = finite_or_zero(coverage_percent).clamp(0.0, 100.0) / 100.0;
            let wage = finite_or_zero(hourly_wage);
            let target = expenses * 12.0 * TRADITIONAL_MULTIPLE * coverage;
            let income_gap = expenses * (1.0 - coverage);
            let required_weekly_hours = if wage > 0.0 {
                income_gap / wage / WEEKS_PER_MONTH
            } else {
                0.0
            };
            Plan {
                target,
                retirement_target: target,
                contribution: finite_or_zero(monthly_contribution),
                extra: FireExtra::Barista {
                    coverage_percent: coverage * 100.0,
                    income_gap,
                    required_weekly_hours,
                },
            }
        }
        FireVariant::GeoArbitrage {
            monthly_expenses,
            origin_cost_index,
            destination_cost_index,
            monthly_contribution,
        } => {
            let expenses = finite_or_zero(monthly_expenses);
            let origin = finite_or_zero(origin_cost_index);
            let destination = finite_or_zero(destination_cost_index);
            let cost_ratio = if origin > 0.0 && destination > 0.0 {
                destination / origin
            } else {
                1.0
            };
            let adjusted_monthly_expenses = expenses * cost_ratio;
            let target = adjusted_monthly_expenses * 12.0 * TRADITIONAL_MULTIPLE;
            Plan {
                target,
                retirement_target: target,
                contribution: finite_or_zero(monthly_contribution),
                extra: FireExtra::GeoArbitrage {
                    cost_ratio,
                    adjusted_monthly_expenses,
                    purchasing_power_gain_percent: (1.0 - cost_ratio) * 100.0,
                },
            }
        }
    }
}

fn discount(amount: f64, annual_growth_rate: f64, months: u32) -> f64 {
    let factor = (1.0 + monthly_rate(annual_growth_rate)).powf(f64::from(months));
    if factor > 0.0 { amount / factor } else { amount }
}
