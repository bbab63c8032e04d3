//! Year-by-year cost and capacity projection.
//!
//! Each year is derived from the base estate alone: demand is scaled by the
//! compounded growth factor, prices by the compounded inflation factor, and
//! the node count is recomputed from scratch. The only state carried between
//! years is the pair of running cumulative totals.

use crate::error::{EngineError, Result};
use crate::pricing::{automation_efficiency, automation_gain, legacy_annual_cost, migration_labor_cost, target_annual_cost};
use crate::sizing::required_nodes;
use crate::types::{
    EstateTotals, LaborModel, PricingPolicy, Projection, ProjectionAssumptions, SizingPolicy,
    YearlyProjection,
};

impl ProjectionAssumptions {
    /// Assumptions with the automation gain implied by the add-on choice.
    pub fn new(horizon_years: u32, workload_growth_rate: f64, subscription_inflation_rate: f64, addon_included: bool) -> Self {
        ProjectionAssumptions {
            horizon_years,
            workload_growth_rate,
            subscription_inflation_rate,
            addon_included,
            automation_efficiency_gain: automation_efficiency(addon_included),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_years < 1 {
            return Err(EngineError::invalid_policy("projection horizon must be at least 1 year"));
        }
        for (what, rate) in [
            ("workload growth rate", self.workload_growth_rate),
            ("subscription inflation rate", self.subscription_inflation_rate),
        ] {
            if !(rate > -1.0) || !rate.is_finite() {
                return Err(EngineError::invalid_policy(format!(
                    "{} must be greater than -100% (got {})",
                    what, rate
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.automation_efficiency_gain) {
            return Err(EngineError::invalid_policy(format!(
                "automation efficiency gain must be within [0, 1] (got {})",
                self.automation_efficiency_gain
            )));
        }
        Ok(())
    }

    pub fn growth_factor(&self, year: u32) -> f64 {
        compound(self.workload_growth_rate, year)
    }

    pub fn inflation_factor(&self, year: u32) -> f64 {
        compound(self.subscription_inflation_rate, year)
    }
}

/// `(1 + rate)^(year - 1)`; year 1 is the base year.
fn compound(rate: f64, year: u32) -> f64 {
    let exponent = i32::try_from(year.saturating_sub(1)).unwrap_or(i32::MAX);
    (1.0 + rate).powi(exponent)
}

/// Everything the engine needs besides the base estate.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInputs {
    pub sizing: SizingPolicy,
    pub pricing: PricingPolicy,
    pub labor: LaborModel,
    pub assumptions: ProjectionAssumptions,
}

impl EngineInputs {
    pub fn validate(&self) -> Result<()> {
        self.sizing.validate()?;
        self.pricing.validate()?;
        self.labor.validate()?;
        self.assumptions.validate()
    }
}

/// Run the full projection. Inputs are validated up front; nothing is
/// computed if any parameter is out of range.
pub fn project(base: &EstateTotals, inputs: &EngineInputs) -> Result<Projection> {
    inputs.validate()?;
    let EngineInputs { sizing, pricing, labor, assumptions } = inputs;

    let labor_breakdown = migration_labor_cost(base.vm_count_whole(), labor);
    let yearly_automation_gain = automation_gain(labor.hourly_rate, assumptions.automation_efficiency_gain);

    let mut legacy_cumulative = 0.0;
    let mut target_cumulative = labor_breakdown.cost;
    let mut years = Vec::with_capacity(assumptions.horizon_years as usize);

    for year in 1..=assumptions.horizon_years {
        let totals = base.scaled(assumptions.growth_factor(year));
        let prices = pricing.inflated(assumptions.inflation_factor(year));
        let nodes = required_nodes(&totals, sizing)?;

        let legacy = legacy_annual_cost(&totals, sizing.consolidation_ratio, &prices.legacy);
        let rhel_credit = totals.rhel_like_count * prices.rhel_entitlement_value;
        let (target, breakdown) = target_annual_cost(
            nodes,
            &prices.target,
            assumptions.addon_included,
            totals.total_storage_tib,
            rhel_credit,
            yearly_automation_gain,
        );

        legacy_cumulative += legacy;
        target_cumulative += target;
        log::debug!(
            "year {}: {:.1} VMs, {} nodes, legacy {:.2}, target {:.2}",
            year,
            totals.vm_count,
            nodes,
            legacy,
            target
        );

        years.push(YearlyProjection {
            year_index: year,
            totals,
            required_nodes: nodes,
            legacy_annual_cost: legacy,
            target_annual_cost: target,
            target_breakdown: breakdown,
            legacy_cumulative_cost: legacy_cumulative,
            target_cumulative_cost: target_cumulative,
        });
    }

    let break_even_year = years
        .iter()
        .find(|y| y.target_cumulative_cost <= y.legacy_cumulative_cost)
        .map(|y| y.year_index);

    log::info!(
        "projected {} year(s): legacy {:.2}, target {:.2}",
        years.len(),
        legacy_cumulative,
        target_cumulative
    );

    Ok(Projection {
        years,
        labor: labor_breakdown,
        legacy_cumulative_cost: legacy_cumulative,
        target_cumulative_cost: target_cumulative,
        cumulative_savings: legacy_cumulative - target_cumulative,
        break_even_year,
    })
}
