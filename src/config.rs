use std::path::PathBuf;

use clap::{Parser, ValueEnum};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// How control changes reach the sales chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UpdateMode {
    /// Every dropdown/slider change recomputes the chart immediately.
    Live,
    /// Controls only edit the selection; the Update / Reset buttons fire.
    #[default]
    OnDemand,
}

#[derive(Debug, Parser)]
#[command(name = "supermart-dash", version, about = "Supermart grocery sales dashboard")]
pub struct Cli {
    /// Sales file to open (.csv, .json or .parquet).
    pub data: Option<PathBuf>,

    /// How the sales chart reacts to control changes.
    #[arg(long, value_enum, default_value_t = UpdateMode::OnDemand)]
    pub mode: UpdateMode,

    /// Start with the bundled sample even when a file is given.
    #[arg(long)]
    pub sample: bool,
}

/// Start-up configuration handed to the app.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub data_path: Option<PathBuf>,
    pub update_mode: UpdateMode,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        AppConfig {
            data_path: if cli.sample { None } else { cli.data },
            update_mode: cli.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_on_demand_sample() {
        let cfg: AppConfig = Cli::parse_from(["supermart-dash"]).into();
        assert_eq!(cfg.data_path, None);
        assert_eq!(cfg.update_mode, UpdateMode::OnDemand);
    }

    #[test]
    fn parses_path_and_mode() {
        let cfg: AppConfig = Cli::parse_from(["supermart-dash", "sales.csv", "--mode", "live"]).into();
        assert_eq!(cfg.data_path, Some(PathBuf::from("sales.csv")));
        assert_eq!(cfg.update_mode, UpdateMode::Live);
    }

    #[test]
    fn sample_flag_ignores_path() {
        let cfg: AppConfig = Cli::parse_from(["supermart-dash", "sales.csv", "--sample"]).into();
        assert_eq!(cfg.data_path, None);
    }

    #[test]
    fn on_demand_value_name() {
        let cli = Cli::parse_from(["supermart-dash", "--mode", "on-demand"]);
        assert_eq!(cli.mode, UpdateMode::OnDemand);
    }
}
