//! Assumption file (`v2o.toml`).
//!
//! Every key is optional. Percentages are written the way an analyst enters
//! them (`overhead_pct = 10`) and converted to fractions when the engine
//! inputs are built. Built-in prices are placeholders for a first run, not
//! quotes; real numbers belong in the file.

use crate::error::{EngineError, Result};
use crate::projection::EngineInputs;
use crate::types::{
    ComplexityMix, EditionPricing, LaborModel, LegacyPricing, PricingPolicy, ProjectionAssumptions,
    SizingPolicy, TierHours,
};
use chrono::Datelike;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "v2o.toml";

pub const CONSOLIDATION_RANGE: RangeInclusive<f64> = 1.0..=6.0;
pub const OVERHEAD_PCT_RANGE: RangeInclusive<f64> = 0.0..=30.0;
pub const HORIZON_RANGE: RangeInclusive<u32> = 1..=7;
pub const GROWTH_PCT_RANGE: RangeInclusive<f64> = 0.0..=20.0;
pub const INFLATION_PCT_RANGE: RangeInclusive<f64> = 0.0..=15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NodeProfile {
    /// 16 cores, 128 GiB
    Small,
    /// 32 cores, 256 GiB
    Standard,
    /// 64 cores, 512 GiB
    Large,
    /// 96 cores, 1024 GiB
    Dense,
    /// `custom_cores` / `custom_ram_gib`
    Custom,
}

impl NodeProfile {
    pub fn preset(&self) -> Option<(u32, f64)> {
        match self {
            NodeProfile::Small => Some((16, 128.0)),
            NodeProfile::Standard => Some((32, 256.0)),
            NodeProfile::Large => Some((64, 512.0)),
            NodeProfile::Dense => Some((96, 1024.0)),
            NodeProfile::Custom => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub consolidation_ratio: f64,
    pub overhead_pct: f64,
    pub ha_margin: u32,
    pub node_profile: NodeProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_cores: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_ram_gib: Option<f64>,
}

impl Default for SizingConfig {
    fn default() -> Self {
        SizingConfig {
            consolidation_ratio: 4.0,
            overhead_pct: 10.0,
            ha_margin: 1,
            node_profile: NodeProfile::Standard,
            custom_cores: None,
            custom_ram_gib: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub horizon_years: u32,
    pub workload_growth_pct: f64,
    pub subscription_inflation_pct: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            horizon_years: 3,
            workload_growth_pct: 5.0,
            subscription_inflation_pct: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    pub per_core_annual_price: f64,
    pub per_tib_storage_annual_price: f64,
    pub storage_uplift_factor: f64,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        LegacyConfig {
            per_core_annual_price: 350.0,
            per_tib_storage_annual_price: 1_500.0,
            storage_uplift_factor: 1.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionPrices {
    pub base_per_node: f64,
    #[serde(default)]
    pub addon_per_node: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub edition: String,
    pub management_addon: bool,
    pub per_tib_storage_annual_price: f64,
    pub rhel_credit_per_vm: f64,
    pub editions: BTreeMap<String, EditionPrices>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let mut editions = BTreeMap::new();
        editions.insert(
            "platform-plus".to_string(),
            EditionPrices { base_per_node: 24_000.0, addon_per_node: 0.0 },
        );
        editions.insert(
            "container-platform".to_string(),
            EditionPrices { base_per_node: 17_000.0, addon_per_node: 6_500.0 },
        );
        editions.insert(
            "kubernetes-engine".to_string(),
            EditionPrices { base_per_node: 9_000.0, addon_per_node: 6_500.0 },
        );
        TargetConfig {
            edition: "container-platform".to_string(),
            management_addon: true,
            per_tib_storage_annual_price: 800.0,
            rhel_credit_per_vm: 800.0,
            editions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborConfig {
    pub easy_pct: f64,
    pub medium_pct: f64,
    pub hard_pct: f64,
    pub easy_hours: f64,
    pub medium_hours: f64,
    pub hard_hours: f64,
    pub hourly_rate: f64,
}

impl Default for LaborConfig {
    fn default() -> Self {
        LaborConfig {
            easy_pct: 60.0,
            medium_pct: 30.0,
            hard_pct: 10.0,
            easy_hours: 4.0,
            medium_hours: 16.0,
            hard_hours: 40.0,
            hourly_rate: 175.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Calendar year of projection year 1; the current year when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    pub sizing: SizingConfig,
    pub projection: ProjectionConfig,
    pub legacy: LegacyConfig,
    pub target: TargetConfig,
    pub labor: LaborConfig,
}

impl AnalysisConfig {
    /// Explicit path, else `v2o.toml` in the working directory, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            log::info!("using {}", local.display());
            return Self::from_file(&local);
        }
        log::debug!("no config file found, using built-in assumptions");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn start_year(&self) -> i32 {
        self.start_year.unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Check the ranges the analysis accepts for each adjustable assumption.
    pub fn validate(&self) -> Result<()> {
        check_range("consolidation ratio", self.sizing.consolidation_ratio, &CONSOLIDATION_RANGE)?;
        check_range("system overhead %", self.sizing.overhead_pct, &OVERHEAD_PCT_RANGE)?;
        if !HORIZON_RANGE.contains(&self.projection.horizon_years) {
            return Err(EngineError::invalid_policy(format!(
                "projection horizon must be {}-{} years (got {})",
                HORIZON_RANGE.start(),
                HORIZON_RANGE.end(),
                self.projection.horizon_years
            )));
        }
        check_range("workload growth %", self.projection.workload_growth_pct, &GROWTH_PCT_RANGE)?;
        check_range(
            "subscription inflation %",
            self.projection.subscription_inflation_pct,
            &INFLATION_PCT_RANGE,
        )?;
        let mix = self.labor.easy_pct + self.labor.medium_pct + self.labor.hard_pct;
        if (mix - 100.0).abs() > 1e-6 {
            return Err(EngineError::invalid_policy(format!(
                "migration complexity mix must add up to 100% (got {}%)",
                mix
            )));
        }
        Ok(())
    }

    pub fn node_spec(&self) -> Result<(u32, f64)> {
        if let Some(spec) = self.sizing.node_profile.preset() {
            return Ok(spec);
        }
        match (self.sizing.custom_cores, self.sizing.custom_ram_gib) {
            (Some(cores), Some(ram)) => Ok((cores, ram)),
            _ => Err(EngineError::invalid_policy(
                "custom node profile needs both custom_cores and custom_ram_gib",
            )),
        }
    }

    pub fn edition_prices(&self) -> Result<&EditionPrices> {
        self.target
            .editions
            .get(&self.target.edition)
            .ok_or_else(|| EngineError::UnknownEdition(self.target.edition.clone()))
    }

    /// Validated engine parameters built from this file.
    pub fn engine_inputs(&self) -> Result<EngineInputs> {
        self.validate()?;
        let (node_cores, node_ram_gib) = self.node_spec()?;
        let edition = self.edition_prices()?;

        let inputs = EngineInputs {
            sizing: SizingPolicy {
                node_cores,
                node_ram_gib,
                overhead_fraction: self.sizing.overhead_pct / 100.0,
                consolidation_ratio: self.sizing.consolidation_ratio,
                ha_margin: self.sizing.ha_margin,
            },
            pricing: PricingPolicy {
                edition: self.target.edition.clone(),
                legacy: LegacyPricing {
                    per_core_annual_price: self.legacy.per_core_annual_price,
                    per_tib_storage_annual_price: self.legacy.per_tib_storage_annual_price,
                    storage_uplift_factor: self.legacy.storage_uplift_factor,
                },
                target: EditionPricing {
                    base_subscription_per_node: edition.base_per_node,
                    addon_subscription_per_node: edition.addon_per_node,
                    per_tib_storage_annual_price: self.target.per_tib_storage_annual_price,
                },
                rhel_entitlement_value: self.target.rhel_credit_per_vm,
            },
            labor: LaborModel {
                complexity_mix: ComplexityMix {
                    easy_fraction: self.labor.easy_pct / 100.0,
                    medium_fraction: self.labor.medium_pct / 100.0,
                    hard_fraction: self.labor.hard_pct / 100.0,
                },
                hours_per_asset: TierHours {
                    easy: self.labor.easy_hours,
                    medium: self.labor.medium_hours,
                    hard: self.labor.hard_hours,
                },
                hourly_rate: self.labor.hourly_rate,
            },
            assumptions: ProjectionAssumptions::new(
                self.projection.horizon_years,
                self.projection.workload_growth_pct / 100.0,
                self.projection.subscription_inflation_pct / 100.0,
                self.target.management_addon,
            ),
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

fn check_range(what: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid_policy(format!(
            "{} must be between {} and {} (got {})",
            what,
            range.start(),
            range.end(),
            value
        )))
    }
}
