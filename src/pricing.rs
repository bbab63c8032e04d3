//! Annual cost formulas for both platforms and the one-time migration labor.

use crate::error::{EngineError, Result};
use crate::types::{
    ComplexityMix, EditionPricing, EstateTotals, LaborBreakdown, LaborModel, LegacyPricing,
    PricingPolicy, TargetCostBreakdown,
};

/// Minimum physical cores charged per VM on the legacy platform.
pub const LEGACY_MIN_CORES_PER_VM: f64 = 2.0;

/// Operations effort the automation gain is measured against.
pub const OPS_HOURS_PER_MONTH: f64 = 80.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

pub const AUTOMATION_EFFICIENCY_WITH_ADDON: f64 = 0.9;
pub const AUTOMATION_EFFICIENCY_WITHOUT_ADDON: f64 = 0.4;

const MIX_TOLERANCE: f64 = 1e-6;

impl PricingPolicy {
    pub fn validate(&self) -> Result<()> {
        let prices = [
            ("legacy per-core price", self.legacy.per_core_annual_price),
            ("legacy per-TiB price", self.legacy.per_tib_storage_annual_price),
            ("base subscription per node", self.target.base_subscription_per_node),
            ("add-on subscription per node", self.target.addon_subscription_per_node),
            ("target per-TiB price", self.target.per_tib_storage_annual_price),
            ("RHEL entitlement value", self.rhel_entitlement_value),
        ];
        for (what, value) in prices {
            ensure_non_negative(what, value)?;
        }
        if !(self.legacy.storage_uplift_factor >= 1.0) || !self.legacy.storage_uplift_factor.is_finite() {
            return Err(EngineError::invalid_policy(format!(
                "storage uplift factor must be at least 1.0 (got {})",
                self.legacy.storage_uplift_factor
            )));
        }
        Ok(())
    }

    /// Same policy with every subscription price multiplied by `factor`.
    pub fn inflated(&self, factor: f64) -> PricingPolicy {
        PricingPolicy {
            edition: self.edition.clone(),
            legacy: LegacyPricing {
                per_core_annual_price: self.legacy.per_core_annual_price * factor,
                per_tib_storage_annual_price: self.legacy.per_tib_storage_annual_price * factor,
                storage_uplift_factor: self.legacy.storage_uplift_factor,
            },
            target: EditionPricing {
                base_subscription_per_node: self.target.base_subscription_per_node * factor,
                addon_subscription_per_node: self.target.addon_subscription_per_node * factor,
                per_tib_storage_annual_price: self.target.per_tib_storage_annual_price * factor,
            },
            rhel_entitlement_value: self.rhel_entitlement_value,
        }
    }
}

impl LaborModel {
    pub fn validate(&self) -> Result<()> {
        let mix = &self.complexity_mix;
        for (what, value) in [
            ("easy fraction", mix.easy_fraction),
            ("medium fraction", mix.medium_fraction),
            ("hard fraction", mix.hard_fraction),
            ("easy hours", self.hours_per_asset.easy),
            ("medium hours", self.hours_per_asset.medium),
            ("hard hours", self.hours_per_asset.hard),
            ("hourly rate", self.hourly_rate),
        ] {
            ensure_non_negative(what, value)?;
        }
        let sum = mix.easy_fraction + mix.medium_fraction + mix.hard_fraction;
        if (sum - 1.0).abs() > MIX_TOLERANCE {
            return Err(EngineError::invalid_policy(format!(
                "complexity mix must sum to 1.0 (got {})",
                sum
            )));
        }
        Ok(())
    }
}

fn ensure_non_negative(what: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_policy(format!(
            "{} must be a non-negative number (got {})",
            what, value
        )))
    }
}

/// Annual legacy cost: cores (with a per-VM floor) plus uplifted storage.
pub fn legacy_annual_cost(totals: &EstateTotals, consolidation_ratio: f64, pricing: &LegacyPricing) -> f64 {
    let cores = (totals.total_vcpu / consolidation_ratio).max(totals.vm_count * LEGACY_MIN_CORES_PER_VM);
    cores * pricing.per_core_annual_price
        + totals.total_storage_tib * pricing.per_tib_storage_annual_price * pricing.storage_uplift_factor
}

/// Annual target cost, itemized. Credits are subtracted as-is, so the net
/// can go negative for very small estates.
pub fn target_annual_cost(
    nodes: u32,
    pricing: &EditionPricing,
    addon_included: bool,
    storage_tib: f64,
    rhel_credit: f64,
    automation_gain: f64,
) -> (f64, TargetCostBreakdown) {
    let per_node = pricing.base_subscription_per_node
        + if addon_included { pricing.addon_subscription_per_node } else { 0.0 };
    let breakdown = TargetCostBreakdown {
        subscription: f64::from(nodes) * per_node,
        storage: storage_tib * pricing.per_tib_storage_annual_price,
        rhel_credit,
        automation_gain,
    };
    let total = breakdown.subscription + breakdown.storage - breakdown.rhel_credit - breakdown.automation_gain;
    (total, breakdown)
}

pub fn automation_efficiency(addon_included: bool) -> f64 {
    if addon_included {
        AUTOMATION_EFFICIENCY_WITH_ADDON
    } else {
        AUTOMATION_EFFICIENCY_WITHOUT_ADDON
    }
}

/// Yearly operations saving from automation on the target platform.
pub fn automation_gain(hourly_rate: f64, efficiency: f64) -> f64 {
    hourly_rate * MONTHS_PER_YEAR * OPS_HOURS_PER_MONTH * efficiency
}

/// Split `vm_count` into (easy, medium, hard). Hard takes the remainder so
/// the three always add back up to `vm_count`.
pub fn split_by_complexity(vm_count: u64, mix: &ComplexityMix) -> (u64, u64, u64) {
    let tier = |fraction: f64| ((vm_count as f64) * fraction).floor().max(0.0) as u64;
    let easy = tier(mix.easy_fraction).min(vm_count);
    let medium = tier(mix.medium_fraction).min(vm_count - easy);
    let hard = vm_count - easy - medium;
    (easy, medium, hard)
}

pub fn migration_labor_cost(vm_count: u64, labor: &LaborModel) -> LaborBreakdown {
    let (easy, medium, hard) = split_by_complexity(vm_count, &labor.complexity_mix);
    let hours = &labor.hours_per_asset;
    let total_hours = easy as f64 * hours.easy + medium as f64 * hours.medium + hard as f64 * hours.hard;
    LaborBreakdown {
        easy_count: easy,
        medium_count: medium,
        hard_count: hard,
        total_hours,
        cost: total_hours * labor.hourly_rate,
    }
}
