use crate::estate::os_category_counts;
use crate::types::{
    AssetRecord, CostRow, EstateRow, EstateTotals, OsCategoryRow, Projection, SizingRow,
    SummaryStats,
};
use crate::util::{format_number, percent};

/// Calendar year for a 1-based projection year.
fn calendar_year(start_year: i32, year_index: u32) -> i32 {
    start_year + year_index as i32 - 1
}

pub fn estate_table(totals: &EstateTotals) -> Vec<EstateRow> {
    vec![EstateRow {
        vm_count: format_number(totals.vm_count, 0),
        total_vcpu: format_number(totals.total_vcpu, 0),
        total_ram_gib: format_number(totals.total_ram_gib, 0),
        total_storage_tib: format_number(totals.total_storage_tib, 2),
        rhel_like_count: format_number(totals.rhel_like_count, 0),
    }]
}

/// OS families, largest first; ties keep category order.
pub fn os_breakdown(records: &[AssetRecord]) -> Vec<OsCategoryRow> {
    let total = records.len() as f64;
    let mut counts: Vec<_> = os_category_counts(records).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(category, count)| OsCategoryRow {
            category: category.label().to_string(),
            vm_count: count,
            share_pct: format_number(percent(count as f64, total), 1),
        })
        .collect()
}

pub fn sizing_table(projection: &Projection, start_year: i32) -> Vec<SizingRow> {
    projection
        .years
        .iter()
        .map(|y| SizingRow {
            year: calendar_year(start_year, y.year_index),
            vm_count: format_number(y.totals.vm_count, 0),
            total_vcpu: format_number(y.totals.total_vcpu, 0),
            total_ram_gib: format_number(y.totals.total_ram_gib, 0),
            total_storage_tib: format_number(y.totals.total_storage_tib, 2),
            required_nodes: y.required_nodes,
        })
        .collect()
}

pub fn cost_table(projection: &Projection, start_year: i32) -> Vec<CostRow> {
    projection
        .years
        .iter()
        .map(|y| CostRow {
            year: calendar_year(start_year, y.year_index),
            legacy_annual: format_number(y.legacy_annual_cost, 2),
            target_annual: format_number(y.target_annual_cost, 2),
            legacy_cumulative: format_number(y.legacy_cumulative_cost, 2),
            target_cumulative: format_number(y.target_cumulative_cost, 2),
            cumulative_savings: format_number(y.legacy_cumulative_cost - y.target_cumulative_cost, 2),
        })
        .collect()
}

pub fn generate_summary(
    base: &EstateTotals,
    projection: &Projection,
    edition: &str,
    start_year: i32,
    coerced_cells: usize,
) -> SummaryStats {
    let first_nodes = projection.years.first().map(|y| y.required_nodes).unwrap_or(0);
    let last_nodes = projection.years.last().map(|y| y.required_nodes).unwrap_or(0);
    SummaryStats {
        edition: edition.to_string(),
        start_year,
        horizon_years: projection.years.len() as u32,
        base_estate: *base,
        coerced_cells,
        base_required_nodes: first_nodes,
        final_required_nodes: last_nodes,
        migration_labor_cost: projection.labor.cost,
        legacy_cumulative_cost: projection.legacy_cumulative_cost,
        target_cumulative_cost: projection.target_cumulative_cost,
        cumulative_savings: projection.cumulative_savings,
        break_even_year: projection.break_even_year.map(|y| calendar_year(start_year, y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LaborBreakdown, TargetCostBreakdown, YearlyProjection};

    fn projection() -> Projection {
        let year = |idx: u32, legacy_cum: f64, target_cum: f64| YearlyProjection {
            year_index: idx,
            totals: EstateTotals {
                vm_count: 100.0,
                total_vcpu: 1200.0,
                total_ram_gib: 4096.0,
                total_storage_tib: 12.5,
                rhel_like_count: 30.0,
            },
            required_nodes: 10 + idx,
            legacy_annual_cost: 1000.0,
            target_annual_cost: 800.0,
            target_breakdown: TargetCostBreakdown::default(),
            legacy_cumulative_cost: legacy_cum,
            target_cumulative_cost: target_cum,
        };
        Projection {
            years: vec![year(1, 1000.0, 1500.0), year(2, 2000.0, 2300.0), year(3, 3000.0, 3100.0)],
            labor: LaborBreakdown { cost: 700.0, ..LaborBreakdown::default() },
            legacy_cumulative_cost: 3000.0,
            target_cumulative_cost: 3100.0,
            cumulative_savings: -100.0,
            break_even_year: None,
        }
    }

    #[test]
    fn tables_use_calendar_years() {
        let p = projection();
        let sizing = sizing_table(&p, 2026);
        assert_eq!(sizing.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2026, 2027, 2028]);
        assert_eq!(sizing[0].total_vcpu, "1,200");
        assert_eq!(sizing[2].required_nodes, 13);

        let costs = cost_table(&p, 2026);
        assert_eq!(costs[0].cumulative_savings, "-500.00");
        assert_eq!(costs[2].target_cumulative, "3,100.00");
    }

    #[test]
    fn summary_picks_first_and_last_node_counts() {
        let p = projection();
        let s = generate_summary(&EstateTotals::default(), &p, "platform-plus", 2030, 4);
        assert_eq!(s.base_required_nodes, 11);
        assert_eq!(s.final_required_nodes, 13);
        assert_eq!(s.horizon_years, 3);
        assert_eq!(s.break_even_year, None);
        assert_eq!(s.coerced_cells, 4);
    }

    #[test]
    fn os_breakdown_sorted_by_count() {
        let rec = |os: &str| AssetRecord {
            name: String::new(),
            vcpu_count: 1,
            memory_mib: 0.0,
            os_label: os.to_string(),
            disk_capacity_mib: None,
        };
        let records = vec![
            rec("Microsoft Windows Server 2019 (64-bit)"),
            rec("Microsoft Windows Server 2022 (64-bit)"),
            rec("Red Hat Enterprise Linux 8 (64-bit)"),
            rec("Ubuntu Linux (64-bit)"),
        ];
        let rows = os_breakdown(&records);
        assert_eq!(rows[0].category, "Windows");
        assert_eq!(rows[0].vm_count, 2);
        assert_eq!(rows[0].share_pct, "50.0");
        assert_eq!(rows.len(), 3);
        assert!(os_breakdown(&[]).is_empty());
    }
}
