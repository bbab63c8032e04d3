use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// Canonical inventory fields the schema resolver maps onto real column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CanonicalField {
    Vm,
    Cpus,
    Memory,
    Os,
    Disk,
}

impl CanonicalField {
    /// Identifier used in messages and in the substring fallback rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Vm => "VM",
            CanonicalField::Cpus => "CPUs",
            CanonicalField::Memory => "Memory",
            CanonicalField::Os => "OS",
            CanonicalField::Disk => "Disk",
        }
    }

    /// Disk is optional: exports without it are costed with zero storage.
    pub fn is_required(&self) -> bool {
        !matches!(self, CanonicalField::Disk)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized inventory row.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub name: String,
    pub vcpu_count: u32,
    pub memory_mib: f64,
    pub os_label: String,
    pub disk_capacity_mib: Option<f64>,
}

impl AssetRecord {
    pub fn disk_mib(&self) -> f64 {
        self.disk_capacity_mib.unwrap_or(0.0)
    }
}

/// Estate-wide totals for one point in time.
///
/// Counts are held as `f64` because projected years scale every field by the
/// same growth factor; the base year always carries whole numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EstateTotals {
    pub vm_count: f64,
    pub total_vcpu: f64,
    pub total_ram_gib: f64,
    pub total_storage_tib: f64,
    pub rhel_like_count: f64,
}

impl EstateTotals {
    pub fn scaled(&self, factor: f64) -> EstateTotals {
        EstateTotals {
            vm_count: self.vm_count * factor,
            total_vcpu: self.total_vcpu * factor,
            total_ram_gib: self.total_ram_gib * factor,
            total_storage_tib: self.total_storage_tib * factor,
            rhel_like_count: self.rhel_like_count * factor,
        }
    }

    pub fn vm_count_whole(&self) -> u64 {
        self.vm_count.round().max(0.0) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingPolicy {
    pub node_cores: u32,
    pub node_ram_gib: f64,
    /// Share of each node reserved for the platform itself, `0 <= x < 1`.
    pub overhead_fraction: f64,
    /// vCPUs per physical core.
    pub consolidation_ratio: f64,
    pub ha_margin: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPricing {
    pub per_core_annual_price: f64,
    pub per_tib_storage_annual_price: f64,
    pub storage_uplift_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditionPricing {
    pub base_subscription_per_node: f64,
    /// Zero when the management add-on is bundled or not offered.
    pub addon_subscription_per_node: f64,
    pub per_tib_storage_annual_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingPolicy {
    pub edition: String,
    pub legacy: LegacyPricing,
    pub target: EditionPricing,
    pub rhel_entitlement_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityMix {
    pub easy_fraction: f64,
    pub medium_fraction: f64,
    pub hard_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierHours {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaborModel {
    pub complexity_mix: ComplexityMix,
    pub hours_per_asset: TierHours,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionAssumptions {
    pub horizon_years: u32,
    pub workload_growth_rate: f64,
    pub subscription_inflation_rate: f64,
    pub addon_included: bool,
    /// Fraction of the fixed annual operations effort saved on the target.
    pub automation_efficiency_gain: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LaborBreakdown {
    pub easy_count: u64,
    pub medium_count: u64,
    pub hard_count: u64,
    pub total_hours: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetCostBreakdown {
    pub subscription: f64,
    pub storage: f64,
    pub rhel_credit: f64,
    pub automation_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyProjection {
    pub year_index: u32,
    pub totals: EstateTotals,
    pub required_nodes: u32,
    pub legacy_annual_cost: f64,
    pub target_annual_cost: f64,
    pub target_breakdown: TargetCostBreakdown,
    pub legacy_cumulative_cost: f64,
    pub target_cumulative_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub years: Vec<YearlyProjection>,
    pub labor: LaborBreakdown,
    pub legacy_cumulative_cost: f64,
    pub target_cumulative_cost: f64,
    pub cumulative_savings: f64,
    /// First year whose cumulative target cost is at or below the legacy one.
    pub break_even_year: Option<u32>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EstateRow {
    #[serde(rename = "VMs")]
    #[tabled(rename = "VMs")]
    pub vm_count: String,
    #[serde(rename = "vCPUs")]
    #[tabled(rename = "vCPUs")]
    pub total_vcpu: String,
    #[serde(rename = "RAM_GiB")]
    #[tabled(rename = "RAM (GiB)")]
    pub total_ram_gib: String,
    #[serde(rename = "Storage_TiB")]
    #[tabled(rename = "Storage (TiB)")]
    pub total_storage_tib: String,
    #[serde(rename = "RHELLike")]
    #[tabled(rename = "RHEL-like")]
    pub rhel_like_count: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct OsCategoryRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "VMs")]
    #[tabled(rename = "VMs")]
    pub vm_count: usize,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share (%)")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SizingRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "VMs")]
    #[tabled(rename = "VMs")]
    pub vm_count: String,
    #[serde(rename = "vCPUs")]
    #[tabled(rename = "vCPUs")]
    pub total_vcpu: String,
    #[serde(rename = "RAM_GiB")]
    #[tabled(rename = "RAM (GiB)")]
    pub total_ram_gib: String,
    #[serde(rename = "Storage_TiB")]
    #[tabled(rename = "Storage (TiB)")]
    pub total_storage_tib: String,
    #[serde(rename = "Nodes")]
    #[tabled(rename = "Nodes")]
    pub required_nodes: u32,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CostRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "LegacyAnnual")]
    #[tabled(rename = "Legacy")]
    pub legacy_annual: String,
    #[serde(rename = "TargetAnnual")]
    #[tabled(rename = "Target")]
    pub target_annual: String,
    #[serde(rename = "LegacyCumulative")]
    #[tabled(rename = "Legacy (cum.)")]
    pub legacy_cumulative: String,
    #[serde(rename = "TargetCumulative")]
    #[tabled(rename = "Target (cum.)")]
    pub target_cumulative: String,
    #[serde(rename = "CumulativeSavings")]
    #[tabled(rename = "Savings (cum.)")]
    pub cumulative_savings: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub edition: String,
    pub start_year: i32,
    pub horizon_years: u32,
    pub base_estate: EstateTotals,
    pub coerced_cells: usize,
    pub base_required_nodes: u32,
    pub final_required_nodes: u32,
    pub migration_labor_cost: f64,
    pub legacy_cumulative_cost: f64,
    pub target_cumulative_cost: f64,
    pub cumulative_savings: f64,
    pub break_even_year: Option<i32>,
}
