use serde::Serialize;

pub const MAX_MONTHS: u32 = 600;

pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    let annual = finite_or_zero(annual_rate_percent).max(-100.0);
    (1.0 + annual / 100.0).powf(1.0 / 12.0) - 1.0
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub max_holding_months: Option<u32>,
    pub rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    // Brackets must be ordered by `max_holding_months`; a `None` bound is the
    // open-ended last bracket.
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    pub fn regressive() -> Self {
        Self::new(vec![
            TaxBracket {
                max_holding_months: Some(6),
                rate_percent: 22.5,
            },
            TaxBracket {
                max_holding_months: Some(12),
                rate_percent: 20.0,
            },
            TaxBracket {
                max_holding_months: Some(24),
                rate_percent: 17.5,
            },
            TaxBracket {
                max_holding_months: None,
                rate_percent: 15.0,
            },
        ])
    }

    pub fn rate_for(&self, holding_months: u32) -> f64 {
        self.brackets
            .iter()
            .find(|b| b.max_holding_months.is_none_or(|max| holding_months <= max))
            .or(self.brackets.last())
            .map(|b| b.rate_percent)
            .unwrap_or(0.0)
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::regressive()
    }
}

pub fn tax_bracket(holding_months: u32) -> f64 {
    TaxSchedule::regressive().rate_for(holding_months)
}

#[derive(Debug, Clone)]
pub struct Iteration<S> {
    pub state: S,
    pub iterations: u32,
    pub reached: bool,
}

// Runs `step` until `done` holds or `max_iterations` steps have been taken.
// `done` is checked before every step, so an initial state that already
// satisfies it comes back with zero iterations. `step` receives the 1-based
// index of the iteration it is performing.
pub fn bounded_iterate<S, D, F>(initial: S, max_iterations: u32, done: D, mut step: F) -> Iteration<S>
where
    D: Fn(&S) -> bool,
    F: FnMut(&mut S, u32),
{
    let mut state = initial;
    let mut iterations = 0;
    while !done(&state) {
        if iterations >= max_iterations {
            return Iteration {
                state,
                iterations,
                reached: false,
            };
        }
        iterations += 1;
        step(&mut state, iterations);
    }
    Iteration {
        state,
        iterations,
        reached: true,
    }
}
