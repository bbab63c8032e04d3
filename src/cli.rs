use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use v2o_navigator::config::{AnalysisConfig, NodeProfile};

#[derive(Parser, Debug)]
#[command(name = "v2o", version, about = "Virtualization estate sizing and cost projection")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only print results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load an inventory export and print estate totals
    Summary {
        inventory: PathBuf,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Size the target cluster and project costs over the horizon
    Project {
        inventory: PathBuf,
        #[arg(long, help = "Assumption file (defaults to ./v2o.toml if present)")]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(long, default_value = ".", help = "Directory for sizing.csv, costs.csv and summary.json")]
        out_dir: PathBuf,
        #[arg(long, help = "Print the summary as JSON instead of tables")]
        json: bool,
    },
    /// Write a synthetic vInfo CSV
    Sample {
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "sample_vinfo.csv")]
        output: PathBuf,
    },
    /// Write the built-in assumptions as a TOML file
    InitConfig {
        #[arg(long, default_value = "v2o.toml")]
        output: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

/// Command-line values that replace the matching assumption-file entries.
#[derive(clap::Args, Debug, Default)]
pub struct Overrides {
    #[arg(long, help = "Projection horizon in years (1-7)")]
    pub horizon: Option<u32>,
    #[arg(long, help = "Annual workload growth in percent (0-20)")]
    pub growth: Option<f64>,
    #[arg(long, help = "Annual subscription inflation in percent (0-15)")]
    pub inflation: Option<f64>,
    #[arg(long, help = "vCPUs per physical core (1.0-6.0)")]
    pub ratio: Option<f64>,
    #[arg(long, help = "System overhead in percent (0-30)")]
    pub overhead: Option<f64>,
    #[arg(long, value_enum)]
    pub node_profile: Option<NodeProfile>,
    #[arg(long, help = "Target edition name from the price table")]
    pub edition: Option<String>,
    #[arg(long, overrides_with = "no_addon", help = "Include the management add-on")]
    pub addon: bool,
    #[arg(long, overrides_with = "addon")]
    pub no_addon: bool,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut AnalysisConfig) {
        if let Some(h) = self.horizon {
            cfg.projection.horizon_years = h;
        }
        if let Some(g) = self.growth {
            cfg.projection.workload_growth_pct = g;
        }
        if let Some(i) = self.inflation {
            cfg.projection.subscription_inflation_pct = i;
        }
        if let Some(r) = self.ratio {
            cfg.sizing.consolidation_ratio = r;
        }
        if let Some(o) = self.overhead {
            cfg.sizing.overhead_pct = o;
        }
        if let Some(p) = self.node_profile {
            cfg.sizing.node_profile = p;
        }
        if let Some(e) = &self.edition {
            cfg.target.edition = e.clone();
        }
        if self.addon {
            cfg.target.management_addon = true;
        } else if self.no_addon {
            cfg.target.management_addon = false;
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let cli = Cli::parse_from([
            "v2o", "project", "inv.csv", "--horizon", "5", "--growth", "12.5", "--no-addon",
            "--node-profile", "large",
        ]);
        let Commands::Project { overrides, .. } = cli.command else {
            panic!("expected project command");
        };
        let mut cfg = AnalysisConfig::default();
        overrides.apply(&mut cfg);
        assert_eq!(cfg.projection.horizon_years, 5);
        assert_eq!(cfg.projection.workload_growth_pct, 12.5);
        assert!(!cfg.target.management_addon);
        assert_eq!(cfg.sizing.node_profile, NodeProfile::Large);
        assert_eq!(cfg.sizing.consolidation_ratio, 4.0);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
