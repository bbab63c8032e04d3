use v2o_navigator::config::AnalysisConfig;
use v2o_navigator::estate::aggregate;
use v2o_navigator::loader::{load_inventory, load_inventory_from_reader};
use v2o_navigator::projection::project;
use v2o_navigator::sizing::required_nodes;
use v2o_navigator::types::CanonicalField;

fn hundred_uniform_vms() -> String {
    let mut csv = String::from("VM,CPUs,Memory,OS\n");
    for i in 0..100 {
        csv.push_str(&format!("vm-{:03},8,\"16,384\",Red Hat Enterprise Linux 8 (64-bit)\n", i));
    }
    csv
}

#[test]
fn uniform_estate_sizes_to_twenty_six_nodes() {
    let (records, report) = load_inventory_from_reader(hundred_uniform_vms().as_bytes()).unwrap();
    assert_eq!(report.coerced_cells, 0);
    assert_eq!(report.columns.column_name(CanonicalField::Disk), None);

    let totals = aggregate(&records);
    assert_eq!(totals.total_vcpu, 800.0);
    assert_eq!(totals.total_ram_gib, 1600.0);
    assert_eq!(totals.total_storage_tib, 0.0);

    let cfg = AnalysisConfig::from_toml_str(
        r#"
[sizing]
node_profile = "custom"
custom_cores = 16
custom_ram_gib = 64.0
overhead_pct = 0.0
consolidation_ratio = 4.0
ha_margin = 1
"#,
    )
    .unwrap();
    let inputs = cfg.engine_inputs().unwrap();
    assert_eq!(required_nodes(&totals, &inputs.sizing).unwrap(), 26);
}

#[test]
fn fixture_with_alternate_headers_loads() {
    let (records, report) = load_inventory("tests/fixtures/alt_headers.csv").unwrap();
    assert_eq!(report.columns.column_name(CanonicalField::Vm), Some("VM Name"));
    assert_eq!(report.columns.column_name(CanonicalField::Os), Some("OS"));
    let totals = aggregate(&records);
    assert_eq!(totals.rhel_like_count, 2.0);
    assert_eq!(totals.total_storage_tib, 40960.0 / 1_048_576.0);
}

#[test]
fn full_pipeline_is_deterministic() {
    let run = || {
        let (records, _) = load_inventory("tests/fixtures/vinfo.csv").unwrap();
        let mut cfg = AnalysisConfig::default();
        cfg.projection.horizon_years = 5;
        cfg.projection.workload_growth_pct = 8.0;
        let inputs = cfg.engine_inputs().unwrap();
        project(&aggregate(&records), &inputs).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(
        serde_json::to_string(&a.years).unwrap(),
        serde_json::to_string(&b.years).unwrap()
    );
    assert_eq!(a.years.len(), 5);
}

#[test]
fn three_year_growth_without_inflation() {
    let (records, _) = load_inventory("tests/fixtures/vinfo.csv").unwrap();
    let base = aggregate(&records);
    let mut cfg = AnalysisConfig::default();
    cfg.projection.horizon_years = 3;
    cfg.projection.workload_growth_pct = 10.0;
    cfg.projection.subscription_inflation_pct = 0.0;
    let p = project(&base, &cfg.engine_inputs().unwrap()).unwrap();
    let year3 = &p.years[2];
    assert!((year3.totals.total_vcpu - base.total_vcpu * 1.1 * 1.1).abs() < 1e-9);
    assert!(year3.required_nodes >= p.years[0].required_nodes);
}

#[test]
fn empty_inventory_projects_the_ha_floor() {
    let (records, _) = load_inventory_from_reader("VM,CPUs,Memory,OS\n".as_bytes()).unwrap();
    let base = aggregate(&records);
    let cfg = AnalysisConfig::default();
    let p = project(&base, &cfg.engine_inputs().unwrap()).unwrap();
    for y in &p.years {
        assert_eq!(y.required_nodes, cfg.sizing.ha_margin);
        assert_eq!(y.legacy_annual_cost, 0.0);
    }
    assert_eq!(p.labor.cost, 0.0);
}
