use serde::{Deserialize, Serialize};

/// Longest comparison window the calculator accepts, in days.
pub const MAX_COMPARISON_PERIOD_DAYS: u32 = 7;

/// Hours a committed-use discount bills per GPU per day.
pub const CUD_HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInputs {
    pub num_gpus: u32,
    /// Hours used per active workload day.
    pub daily_usage_hours: u32,
    /// Days in a full week the workload typically runs.
    pub workload_days_per_week: u32,
    /// Window over which all pricing models are compared.
    pub comparison_period_days: u32,
}

impl Default for UsageInputs {
    fn default() -> Self {
        Self {
            num_gpus: 1,
            daily_usage_hours: 8,
            workload_days_per_week: 5,
            comparison_period_days: MAX_COMPARISON_PERIOD_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    FlexStart,
    OnDemand,
    OneYearCud,
    ThreeYearCud,
}

impl PricingModel {
    /// Canonical order, same as declaration order. Sorting by cost is
    /// stable over this order.
    pub const ALL: [PricingModel; 4] = [
        PricingModel::FlexStart,
        PricingModel::OnDemand,
        PricingModel::OneYearCud,
        PricingModel::ThreeYearCud,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PricingModel::FlexStart => "Flex-Start",
            PricingModel::OnDemand => "On-Demand",
            PricingModel::OneYearCud => "1-Year CUD",
            PricingModel::ThreeYearCud => "3-Year CUD",
        }
    }

    /// Committed-use models bill 24/7 regardless of utilization.
    pub fn is_committed(self) -> bool {
        matches!(self, PricingModel::OneYearCud | PricingModel::ThreeYearCud)
    }
}

/// Price per GPU-hour for each pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRates {
    pub on_demand: f64,
    pub flex_start: f64,
    pub one_year_cud: f64,
    pub three_year_cud: f64,
}

impl PricingRates {
    pub fn rate(&self, model: PricingModel) -> f64 {
        match model {
            PricingModel::OnDemand => self.on_demand,
            PricingModel::FlexStart => self.flex_start,
            PricingModel::OneYearCud => self.one_year_cud,
            PricingModel::ThreeYearCud => self.three_year_cud,
        }
    }

    pub fn set_rate(&mut self, model: PricingModel, rate: f64) {
        match model {
            PricingModel::OnDemand => self.on_demand = rate,
            PricingModel::FlexStart => self.flex_start = rate,
            PricingModel::OneYearCud => self.one_year_cud = rate,
            PricingModel::ThreeYearCud => self.three_year_cud = rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelCost {
    pub model: PricingModel,
    pub total_cost: f64,
    /// GPU-hours the cost was derived from.
    pub hours: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResult {
    pub num_gpus: u32,
    pub comparison_period_days: u32,
    pub active_days: u32,
    /// Metered GPU-hours, billed by on-demand and flex-start.
    pub usage_hours: f64,
    /// Committed GPU-hours, billed by both CUD models.
    pub cud_hours: f64,
    /// One entry per model, in `PricingModel::ALL` order.
    pub costs: [ModelCost; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavingOutcome {
    Saves { amount: f64, percent: f64 },
    CostsMore { amount: f64, percent: f64 },
    Same,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSaving {
    pub model: PricingModel,
    pub outcome: SavingOutcome,
}

/// Savings of each alternative relative to on-demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "models", rename_all = "snake_case")]
pub enum Savings {
    Compared(Vec<ModelSaving>),
    /// On-demand cost is zero, so there is nothing to divide by.
    Unavailable,
}
