use crate::types::{
    CostResult, ModelCost, ModelSaving, PricingModel, PricingRates, SavingOutcome, Savings,
    UsageInputs, CUD_HOURS_PER_DAY,
};

/// Days within the comparison window the workload is assumed to run.
///
/// The weekly cadence is scaled to the window and rounded up to a whole day,
/// but never exceeds the window itself. A heuristic, kept as-is so results
/// stay comparable across versions.
pub fn compute_active_days(workload_days_per_week: u32, comparison_period_days: u32) -> u32 {
    let period = u64::from(comparison_period_days);
    let scaled = (u64::from(workload_days_per_week) * period).div_ceil(7);
    // Never exceeds `comparison_period_days`, so it fits back into u32.
    scaled.min(period) as u32
}

/// Trait for looking up the per-GPU-hour rate of a pricing model.
pub trait RateTable {
    fn rate(&self, model: PricingModel) -> f64;

    fn costs_for(&self, inputs: &UsageInputs) -> CostResult {
        let active_days =
            compute_active_days(inputs.workload_days_per_week, inputs.comparison_period_days);

        let gpus = inputs.num_gpus as f64;
        let usage_hours = gpus * inputs.daily_usage_hours as f64 * active_days as f64;
        let cud_hours = gpus * CUD_HOURS_PER_DAY as f64 * inputs.comparison_period_days as f64;

        let costs = PricingModel::ALL.map(|model| {
            let hours = if model.is_committed() {
                cud_hours
            } else {
                usage_hours
            };
            let rate = self.rate(model);
            ModelCost {
                model,
                total_cost: rate * hours,
                hours,
                rate,
            }
        });

        CostResult {
            num_gpus: inputs.num_gpus,
            comparison_period_days: inputs.comparison_period_days,
            active_days,
            usage_hours,
            cud_hours,
            costs,
        }
    }
}

impl RateTable for PricingRates {
    fn rate(&self, model: PricingModel) -> f64 {
        PricingRates::rate(self, model)
    }
}

/// Total cost of every pricing model for the given usage. Never fails;
/// inputs are expected to be non-negative.
pub fn compute_costs(inputs: &UsageInputs, rates: &dyn RateTable) -> CostResult {
    rates.costs_for(inputs)
}

impl CostResult {
    pub fn cost(&self, model: PricingModel) -> &ModelCost {
        // `costs` follows `PricingModel::ALL`, which matches declaration order.
        &self.costs[model as usize]
    }

    /// Costs ordered cheapest first. Ties keep the canonical model order.
    pub fn sorted(&self) -> [ModelCost; 4] {
        let mut sorted = self.costs;
        sorted.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));
        sorted
    }

    pub fn savings(&self) -> Savings {
        let on_demand = self.cost(PricingModel::OnDemand).total_cost;
        if on_demand <= 0.0 {
            return Savings::Unavailable;
        }

        let compared = PricingModel::ALL
            .into_iter()
            .filter(|m| *m != PricingModel::OnDemand)
            .map(|model| {
                let saving = on_demand - self.cost(model).total_cost;
                let percent = saving / on_demand * 100.0;
                let outcome = if saving > 0.0 {
                    SavingOutcome::Saves {
                        amount: saving,
                        percent,
                    }
                } else if saving < 0.0 {
                    SavingOutcome::CostsMore {
                        amount: saving.abs(),
                        percent: percent.abs(),
                    }
                } else {
                    SavingOutcome::Same
                };
                ModelSaving { model, outcome }
            })
            .collect();

        Savings::Compared(compared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn h100() -> PricingRates {
        PricingRates {
            on_demand: 11.06,
            flex_start: 4.79,
            one_year_cud: 7.67,
            three_year_cud: 4.855,
        }
    }

    fn inputs(gpus: u32, hours: u32, days: u32, period: u32) -> UsageInputs {
        UsageInputs {
            num_gpus: gpus,
            daily_usage_hours: hours,
            workload_days_per_week: days,
            comparison_period_days: period,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn full_week_yields_weekly_cadence() {
        for w in 1..=7 {
            assert_eq!(compute_active_days(w, 7), w);
        }
    }

    #[test]
    fn short_window_rounds_up_and_clamps() {
        // ceil(15 / 7) = 3, and the window holds exactly 3 days
        assert_eq!(compute_active_days(5, 3), 3);
        // ceil(2 / 7) = 1
        assert_eq!(compute_active_days(1, 2), 1);
        // ceil(21 / 7) = 3, clamped to the 3-day window
        assert_eq!(compute_active_days(7, 3), 3);
        assert_eq!(compute_active_days(2, 4), 2);
    }

    #[test]
    fn long_window_does_not_overflow() {
        assert_eq!(compute_active_days(7, 700_000_000), 700_000_000);
        assert_eq!(compute_active_days(7, u32::MAX), u32::MAX);
        assert_eq!(compute_active_days(1, u32::MAX), u32::MAX.div_ceil(7));

        let result = compute_costs(&inputs(1, 8, 5, 700_000_000), &h100());
        assert_eq!(result.active_days, 500_000_000);
        assert_close(result.cud_hours, 24.0 * 700_000_000.0);
    }

    #[test]
    fn default_week_matches_rate_card() {
        let result = compute_costs(&inputs(1, 8, 5, 7), &h100());

        assert_eq!(result.active_days, 5);
        assert_close(result.usage_hours, 40.0);
        assert_close(result.cud_hours, 168.0);
        assert_close(result.cost(PricingModel::OnDemand).total_cost, 442.40);
        assert_close(result.cost(PricingModel::FlexStart).total_cost, 191.60);
        assert_close(result.cost(PricingModel::OneYearCud).total_cost, 1288.56);
        assert_close(result.cost(PricingModel::ThreeYearCud).total_cost, 815.64);
    }

    #[test]
    fn three_day_window() {
        let result = compute_costs(&inputs(2, 8, 5, 3), &h100());

        assert_eq!(result.active_days, 3);
        assert_close(result.usage_hours, 2.0 * 8.0 * 3.0);
        assert_close(result.cud_hours, 2.0 * 24.0 * 3.0);
    }

    #[test]
    fn hours_follow_billing_basis() {
        let result = compute_costs(&inputs(3, 6, 4, 7), &h100());
        for cost in result.costs {
            let expected = if cost.model.is_committed() {
                result.cud_hours
            } else {
                result.usage_hours
            };
            assert_close(cost.hours, expected);
            assert_close(cost.rate, h100().rate(cost.model));
        }
    }

    #[test]
    fn zero_gpus_cost_nothing() {
        let result = compute_costs(&inputs(0, 8, 5, 7), &h100());
        assert!(result.costs.iter().all(|c| c.total_cost == 0.0));
    }

    #[test]
    fn sorted_is_ascending() {
        let sorted = compute_costs(&inputs(1, 8, 5, 7), &h100()).sorted();
        let order: Vec<_> = sorted.iter().map(|c| c.model).collect();
        assert_eq!(
            order,
            vec![
                PricingModel::FlexStart,
                PricingModel::OnDemand,
                PricingModel::ThreeYearCud,
                PricingModel::OneYearCud,
            ]
        );
    }

    #[test]
    fn sorted_keeps_canonical_order_on_ties() {
        let flat = PricingRates {
            on_demand: 1.0,
            flex_start: 1.0,
            one_year_cud: 1.0,
            three_year_cud: 1.0,
        };
        // 24 hours a day, every day: metered and committed hours coincide.
        let sorted = compute_costs(&inputs(1, 24, 7, 7), &flat).sorted();
        let order: Vec<_> = sorted.iter().map(|c| c.model).collect();
        assert_eq!(order, PricingModel::ALL.to_vec());
    }

    #[test]
    fn savings_against_on_demand() {
        let Savings::Compared(savings) = compute_costs(&inputs(1, 8, 5, 7), &h100()).savings()
        else {
            panic!("expected a comparison");
        };

        assert_eq!(savings.len(), 3);
        assert_eq!(savings[0].model, PricingModel::FlexStart);
        match savings[0].outcome {
            SavingOutcome::Saves { amount, percent } => {
                assert_close(amount, 442.40 - 191.60);
                assert_close(percent, (442.40 - 191.60) / 442.40 * 100.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        match savings[1].outcome {
            SavingOutcome::CostsMore { amount, .. } => assert_close(amount, 1288.56 - 442.40),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn savings_same_cost() {
        let rates = PricingRates {
            on_demand: 2.0,
            flex_start: 2.0,
            one_year_cud: 1.0,
            three_year_cud: 1.0,
        };
        let Savings::Compared(savings) = compute_costs(&inputs(1, 8, 5, 7), &rates).savings()
        else {
            panic!("expected a comparison");
        };
        assert_eq!(savings[0].outcome, SavingOutcome::Same);
    }

    #[test]
    fn savings_unavailable_without_on_demand_cost() {
        let mut rates = h100();
        rates.on_demand = 0.0;
        let result = compute_costs(&inputs(1, 8, 5, 7), &rates);
        assert_eq!(result.savings(), Savings::Unavailable);
    }
}
