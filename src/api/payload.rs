use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::{
    DividendParams, FireParams, FireVariant, FixedIncomeParams, GrowthParams, IndexType,
};

pub const DEFAULT_VOLATILITY: f64 = 20.0;

pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        other => coerce_number(other) != 0.0,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| coerce_number(&v)))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| coerce_number(&v).max(0.0) as u32))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match &v {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| coerce_number(&v).max(0.0) as u64),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .unwrap_or_else(|_| coerce_number(&v).max(0.0) as u64),
        _ => 0,
    }))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| coerce_bool(&v)))
}

fn num(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrowthPayload {
    #[serde(deserialize_with = "lenient_f64")]
    pub initial_value: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub monthly_contribution: Option<f64>,
    #[serde(deserialize_with = "lenient_f64", alias = "growthRate")]
    pub annual_growth_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(deserialize_with = "lenient_u32")]
    pub years: Option<u32>,
    #[serde(deserialize_with = "lenient_bool", alias = "reinvest")]
    pub reinvest_dividends: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub inflation_rate: Option<f64>,
}

impl GrowthPayload {
    pub fn into_params(self) -> GrowthParams {
        GrowthParams {
            initial_value: num(self.initial_value),
            monthly_contribution: num(self.monthly_contribution),
            annual_growth_rate: num(self.annual_growth_rate),
            annual_dividend_yield: num(self.dividend_yield),
            years: self.years.unwrap_or(0),
            reinvest_dividends: self.reinvest_dividends.unwrap_or(true),
            annual_inflation_rate: num(self.inflation_rate),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiIndexType {
    #[serde(alias = "percentOfBenchmark", alias = "percent_of_benchmark", alias = "cdi")]
    PercentOfBenchmark,
    #[serde(alias = "benchmarkPlusSpread", alias = "benchmark_plus_spread", alias = "selic")]
    BenchmarkPlusSpread,
    #[serde(alias = "inflationPlusSpread", alias = "inflation_plus_spread", alias = "ipca")]
    InflationPlusSpread,
    #[serde(alias = "fixed-rate", alias = "fixedRate", alias = "prefixado")]
    Fixed,
    #[serde(alias = "priceIndexPlusSpread", alias = "price_index_plus_spread", alias = "igpm")]
    PriceIndexPlusSpread,
}

impl From<ApiIndexType> for IndexType {
    fn from(value: ApiIndexType) -> Self {
        match value {
            ApiIndexType::PercentOfBenchmark => IndexType::PercentOfBenchmark,
            ApiIndexType::BenchmarkPlusSpread => IndexType::BenchmarkPlusSpread,
            ApiIndexType::InflationPlusSpread => IndexType::InflationPlusSpread,
            ApiIndexType::Fixed => IndexType::Fixed,
            ApiIndexType::PriceIndexPlusSpread => IndexType::PriceIndexPlusSpread,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FixedIncomePayload {
    #[serde(deserialize_with = "lenient_f64")]
    pub principal: Option<f64>,
    #[serde(deserialize_with = "lenient_f64", alias = "rate")]
    pub nominal_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_u32", alias = "months")]
    pub holding_months: Option<u32>,
    pub index_type: Option<ApiIndexType>,
    #[serde(deserialize_with = "lenient_f64")]
    pub benchmark_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub inflation_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub tax_exempt: Option<bool>,
}

impl FixedIncomePayload {
    pub fn into_params(self) -> FixedIncomeParams {
        FixedIncomeParams {
            principal: num(self.principal),
            nominal_rate: num(self.nominal_rate),
            holding_months: self.holding_months.unwrap_or(0),
            index_type: self
                .index_type
                .map(Into::into)
                .unwrap_or(IndexType::PercentOfBenchmark),
            benchmark_rate: num(self.benchmark_rate),
            inflation_rate: self.inflation_rate,
            tax_exempt: self.tax_exempt.unwrap_or(false),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiFireVariant {
    Traditional,
    Lean,
    Fat,
    Coast,
    Barista,
    #[serde(alias = "geoArbitrage", alias = "geo_arbitrage", alias = "geographic-arbitrage")]
    GeoArbitrage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FirePayload {
    pub variant: Option<ApiFireVariant>,
    #[serde(deserialize_with = "lenient_u32")]
    pub current_age: Option<u32>,
    #[serde(deserialize_with = "lenient_f64", alias = "currentPatrimony")]
    pub current_wealth: Option<f64>,
    #[serde(deserialize_with = "lenient_f64", alias = "growthRate")]
    pub annual_growth_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub monthly_expenses: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub monthly_contribution: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub monthly_income: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient_u32")]
    pub retirement_age: Option<u32>,
    #[serde(deserialize_with = "lenient_f64")]
    pub coverage_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub hourly_wage: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub origin_cost_index: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub destination_cost_index: Option<f64>,
}

impl FirePayload {
    pub fn into_params(self) -> FireParams {
        let expenses = num(self.monthly_expenses);
        let contribution = num(self.monthly_contribution);
        let variant = match self.variant.unwrap_or(ApiFireVariant::Traditional) {
            ApiFireVariant::Traditional => FireVariant::Traditional {
                monthly_expenses: expenses,
                monthly_contribution: contribution,
            },
            ApiFireVariant::Lean => FireVariant::Lean {
                monthly_income: num(self.monthly_income),
                lean_monthly_expenses: expenses,
            },
            ApiFireVariant::Fat => FireVariant::Fat {
                desired_monthly_expenses: expenses,
                multiplier: num(self.multiplier),
                monthly_contribution: contribution,
            },
            ApiFireVariant::Coast => FireVariant::Coast {
                monthly_expenses_at_retirement: expenses,
                retirement_age: self.retirement_age.unwrap_or(0),
                monthly_contribution: contribution,
            },
            ApiFireVariant::Barista => FireVariant::Barista {
                monthly_expenses: expenses,
                coverage_percent: num(self.coverage_percent),
                hourly_wage: num(self.hourly_wage),
                monthly_contribution: contribution,
            },
            ApiFireVariant::GeoArbitrage => FireVariant::GeoArbitrage {
                monthly_expenses: expenses,
                origin_cost_index: num(self.origin_cost_index),
                destination_cost_index: num(self.destination_cost_index),
                monthly_contribution: contribution,
            },
        };

        FireParams {
            current_age: self.current_age.unwrap_or(0),
            current_wealth: num(self.current_wealth),
            annual_growth_rate: num(self.annual_growth_rate),
            variant,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividendPayload {
    pub ticker: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(deserialize_with = "lenient_u32")]
    pub months: Option<u32>,
    #[serde(deserialize_with = "lenient_f64")]
    pub initial_contribution: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub monthly_contribution: Option<f64>,
    #[serde(deserialize_with = "lenient_bool", alias = "reinvest")]
    pub reinvest_dividends: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub deposit_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub inflation_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub inflation_spread: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub equity_index_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub real_estate_index_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub risk_free_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub gain_tax_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub expected_appreciation: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub volatility: Option<f64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationModel {
    pub annual_drift: f64,
    pub annual_volatility: f64,
    pub seed: Option<u64>,
}

impl DividendPayload {
    pub fn into_params(self) -> (DividendParams, VariationModel) {
        let defaults = DividendParams::default();
        let params = DividendParams {
            price: num(self.price),
            dividend_yield: num(self.dividend_yield),
            months: self.months.unwrap_or(0),
            initial_contribution: num(self.initial_contribution),
            monthly_contribution: num(self.monthly_contribution),
            reinvest_dividends: self.reinvest_dividends.unwrap_or(true),
            deposit_rate: num(self.deposit_rate),
            inflation_rate: num(self.inflation_rate),
            inflation_spread: num(self.inflation_spread),
            equity_index_rate: self
                .equity_index_rate
                .unwrap_or(defaults.equity_index_rate),
            real_estate_index_rate: self
                .real_estate_index_rate
                .unwrap_or(defaults.real_estate_index_rate),
            risk_free_rate: self.risk_free_rate,
            gain_tax_rate: self.gain_tax_rate.unwrap_or(defaults.gain_tax_rate),
        };
        let model = VariationModel {
            annual_drift: num(self.expected_appreciation),
            annual_volatility: self.volatility.unwrap_or(DEFAULT_VOLATILITY),
            seed: self.seed,
        };
        (params, model)
    }
}
