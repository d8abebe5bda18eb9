mod presets;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{PricingModel, PricingRates};

pub use presets::{
    default_family, lookup, normalize_family, MachineFamily, DEFAULT_FAMILY, FAMILIES,
};

#[derive(Error, Debug, PartialEq)]
pub enum PricingError {
    #[error("unknown machine family \"{name}\" (known: {known})")]
    UnknownFamily { name: String, known: String },
    #[error("invalid {model} rate {rate}: must be a finite, non-negative number")]
    InvalidRate { model: &'static str, rate: f64 },
}

/// Per-model rates that replace a preset's defaults when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateOverrides {
    pub on_demand: Option<f64>,
    pub flex_start: Option<f64>,
    pub one_year_cud: Option<f64>,
    pub three_year_cud: Option<f64>,
}

impl RateOverrides {
    pub fn get(&self, model: PricingModel) -> Option<f64> {
        match model {
            PricingModel::OnDemand => self.on_demand,
            PricingModel::FlexStart => self.flex_start,
            PricingModel::OneYearCud => self.one_year_cud,
            PricingModel::ThreeYearCud => self.three_year_cud,
        }
    }

    pub fn is_empty(&self) -> bool {
        PricingModel::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

pub fn find_family(name: &str) -> Result<&'static MachineFamily, PricingError> {
    lookup(name).ok_or_else(|| PricingError::UnknownFamily {
        name: name.to_string(),
        known: FAMILIES
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Start from the family's preset and apply each override layer in order;
/// later layers win.
pub fn resolve_rates(
    family: &MachineFamily,
    layers: &[&RateOverrides],
) -> Result<PricingRates, PricingError> {
    let mut rates = family.rates;
    for layer in layers {
        for model in PricingModel::ALL {
            let Some(rate) = layer.get(model) else {
                continue;
            };
            if !rate.is_finite() || rate < 0.0 {
                return Err(PricingError::InvalidRate {
                    model: model.label(),
                    rate,
                });
            }
            tracing::debug!(
                family = family.name,
                model = model.label(),
                rate,
                "overriding preset rate"
            );
            rates.set_rate(model, rate);
        }
    }
    Ok(rates)
}
