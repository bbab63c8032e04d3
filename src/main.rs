// Entry point and high-level CLI flow.
//
// - `summary` loads and normalizes an inventory export and prints the estate.
// - `project` runs the full sizing and cost projection and writes the tables.
// - `sample` and `init-config` produce starter inputs for the other two.
mod cli;

use clap::Parser;
use cli::{Cli, Commands, Overrides};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use v2o_navigator::config::AnalysisConfig;
use v2o_navigator::error::{EngineError, Result};
use v2o_navigator::types::{EstateTotals, OsCategoryRow};
use v2o_navigator::util::{format_int, format_number};
use v2o_navigator::{estate, loader, output, projection, reports, sample};

#[derive(Serialize)]
struct InventorySummary {
    totals: EstateTotals,
    os_categories: Vec<OsCategoryRow>,
    total_rows: usize,
    skipped_rows: usize,
    coerced_cells: usize,
    columns: BTreeMap<String, String>,
}

/// Handle `summary`: load, normalize and aggregate one inventory file.
fn handle_summary(path: &Path, json: bool) -> Result<()> {
    let (records, load_report) = loader::load_inventory(path)?;
    let totals = estate::aggregate(&records);
    let os_rows = reports::os_breakdown(&records);

    if json {
        let summary = InventorySummary {
            totals,
            os_categories: os_rows,
            total_rows: load_report.total_rows,
            skipped_rows: load_report.skipped_rows,
            coerced_cells: load_report.coerced_cells,
            columns: load_report
                .columns
                .iter()
                .map(|(field, name)| (field.to_string(), name.to_string()))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Processing inventory... ({} rows read, {} loaded)",
        format_int(load_report.total_rows),
        format_int(load_report.loaded_rows)
    );
    if load_report.skipped_rows > 0 {
        println!("Note: {} unreadable rows skipped.", format_int(load_report.skipped_rows));
    }
    if load_report.coerced_cells > 0 {
        println!(
            "Warning: {} numeric cells could not be parsed and were counted as zero.",
            format_int(load_report.coerced_cells)
        );
    }
    println!();
    output::print_table("Infrastructure Summary", &reports::estate_table(&totals));
    output::print_table("Guest OS Breakdown", &os_rows);
    println!(
        "Found {} VMs running Red Hat Enterprise Linux.",
        format_number(totals.rhel_like_count, 0)
    );
    Ok(())
}

/// Handle `project`: the full pipeline from inventory to cost tables.
///
/// Writes `sizing.csv`, `costs.csv` and `summary.json` into `out_dir` and
/// prints previews of each table.
fn handle_project(
    path: &Path,
    config: Option<&Path>,
    overrides: &Overrides,
    out_dir: &Path,
    json: bool,
) -> Result<()> {
    let mut cfg = AnalysisConfig::load(config)?;
    overrides.apply(&mut cfg);
    let inputs = cfg.engine_inputs()?;
    let start_year = cfg.start_year();

    let (records, load_report) = loader::load_inventory(path)?;
    let base = estate::aggregate(&records);
    let result = projection::project(&base, &inputs)?;

    let sizing_rows = reports::sizing_table(&result, start_year);
    let cost_rows = reports::cost_table(&result, start_year);
    let summary = reports::generate_summary(
        &base,
        &result,
        &inputs.pricing.edition,
        start_year,
        load_report.coerced_cells,
    );

    fs::create_dir_all(out_dir)?;
    output::write_csv(out_dir.join("sizing.csv"), &sizing_rows)?;
    output::write_csv(out_dir.join("costs.csv"), &cost_rows)?;
    output::write_json(out_dir.join("summary.json"), &summary)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if load_report.coerced_cells > 0 {
        println!(
            "Warning: {} numeric cells could not be parsed and were counted as zero.\n",
            format_int(load_report.coerced_cells)
        );
    }
    output::print_table("Infrastructure Summary", &reports::estate_table(&base));
    output::print_table(
        &format!(
            "Target Sizing ({}, {} year horizon)",
            inputs.pricing.edition, inputs.assumptions.horizon_years
        ),
        &sizing_rows,
    );
    output::print_table("Cost Projection", &cost_rows);
    println!(
        "Migration labor: {} hours, {} (easy {}, medium {}, hard {})",
        format_number(result.labor.total_hours, 0),
        format_number(result.labor.cost, 2),
        format_int(result.labor.easy_count),
        format_int(result.labor.medium_count),
        format_int(result.labor.hard_count)
    );
    println!(
        "Cumulative savings after {} years: {}",
        inputs.assumptions.horizon_years,
        format_number(result.cumulative_savings, 2)
    );
    match summary.break_even_year {
        Some(year) => println!("Break-even: {}", year),
        None => println!("Break-even: not within the horizon"),
    }
    println!("(Full tables exported to {})", out_dir.display());
    Ok(())
}

fn handle_sample(output_path: &Path, count: usize, seed: u64) -> Result<()> {
    let file = fs::File::create(output_path)?;
    sample::write_sample(file, count, seed)?;
    println!("Generated {} VMs in '{}'", format_int(count), output_path.display());
    Ok(())
}

fn handle_init_config(output_path: &Path, force: bool) -> Result<()> {
    if output_path.exists() && !force {
        return Err(EngineError::Config(format!(
            "{} already exists (use --force to overwrite)",
            output_path.display()
        )));
    }
    fs::write(output_path, AnalysisConfig::default().to_toml()?)?;
    println!("Wrote default assumptions to {}", output_path.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_logging();

    let result = match &cli.command {
        Commands::Summary { inventory, json } => handle_summary(inventory, *json),
        Commands::Project {
            inventory,
            config,
            overrides,
            out_dir,
            json,
        } => handle_project(inventory, config.as_deref(), overrides, out_dir, *json),
        Commands::Sample { count, seed, output } => handle_sample(output, *count, *seed),
        Commands::InitConfig { output, force } => handle_init_config(output, *force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
