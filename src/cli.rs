use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::pricing::{self, MachineFamily, RateOverrides};
use crate::types::{PricingRates, UsageInputs, MAX_COMPARISON_PERIOD_DAYS};

pub const GPU_RANGE: RangeInclusive<u32> = 1..=16;
pub const DAILY_HOURS_RANGE: RangeInclusive<u32> = 1..=24;
pub const DAYS_PER_WEEK_RANGE: RangeInclusive<u32> = 1..=7;
pub const PERIOD_RANGE: RangeInclusive<u32> = 1..=MAX_COMPARISON_PERIOD_DAYS;

#[derive(Parser, Debug)]
#[command(
    name = "gpucost",
    about = "Compare GPU cost across on-demand, flex-start and committed-use pricing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of GPUs (1-16)
    #[arg(long, global = true)]
    pub gpus: Option<u32>,

    /// GPU hours used per workload day (1-24)
    #[arg(long, global = true)]
    pub hours: Option<u32>,

    /// Days per week the workload runs (1-7)
    #[arg(long, global = true)]
    pub days_per_week: Option<u32>,

    /// Comparison period in days (1-7)
    #[arg(long, global = true)]
    pub period: Option<u32>,

    /// Machine family preset, e.g. "A3 High", a2-ultra (see `families`)
    #[arg(long, global = true)]
    pub family: Option<String>,

    /// Override the on-demand rate (USD per GPU-hour)
    #[arg(long, global = true)]
    pub on_demand: Option<f64>,

    /// Override the flex-start rate (USD per GPU-hour)
    #[arg(long, global = true)]
    pub flex_start: Option<f64>,

    /// Override the 1-year CUD rate (USD per GPU-hour)
    #[arg(long, global = true)]
    pub one_year_cud: Option<f64>,

    /// Override the 3-year CUD rate (USD per GPU-hour)
    #[arg(long, global = true)]
    pub three_year_cud: Option<f64>,

    /// Output format: table (default), json
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Columns to display (comma-separated).
    /// Use +col to add, -col to remove from defaults, or plain names to replace.
    /// Available: model,rate,hours,cost,savings,basis
    #[arg(long, global = true, value_delimiter = ',', allow_hyphen_values = true)]
    pub columns: Option<Vec<String>>,

    /// Config file (default: <config dir>/gpucost/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

pub const DEFAULT_COLUMNS: &[&str] = &["model", "rate", "hours", "cost", "savings"];

/// Resolve `--columns` into a final list.
/// - No flag → defaults
/// - All prefixed with +/- → modify defaults (e.g. `+basis,-savings`)
/// - Plain names → explicit replacement (e.g. `model,cost`)
pub fn resolve_columns(raw: Option<Vec<String>>) -> Vec<String> {
    let Some(raw) = raw else {
        return DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect();
    };

    let is_modifier = raw.iter().all(|c| c.starts_with('+') || c.starts_with('-'));

    if !is_modifier {
        return raw;
    }

    let mut cols: Vec<String> = DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect();
    for entry in &raw {
        if let Some(name) = entry.strip_prefix('+') {
            if !cols.iter().any(|c| c == name) {
                cols.push(name.to_string());
            }
        } else if let Some(name) = entry.strip_prefix('-') {
            cols.retain(|c| c != name);
        }
    }
    cols
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Cost table and pricing model details (default)
    Compare,
    /// Pricing model details only
    Cards,
    /// Savings of each model relative to on-demand
    Savings,
    /// Bar chart of total cost per pricing model
    Chart,
    /// List machine family presets and their rates
    Families,
    /// Recompute whenever the config file changes
    Watch {
        /// Minimum seconds between refreshes (debounce)
        #[arg(long, default_value = "1")]
        interval: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Everything a render needs, after flags, config and presets are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub family: &'static MachineFamily,
    pub rates: PricingRates,
    pub inputs: UsageInputs,
    pub as_of: Option<NaiveDate>,
}

impl Cli {
    pub fn effective_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Compare)
    }

    pub fn rate_overrides(&self) -> RateOverrides {
        RateOverrides {
            on_demand: self.on_demand,
            flex_start: self.flex_start,
            one_year_cud: self.one_year_cud,
            three_year_cud: self.three_year_cud,
        }
    }

    /// Flags win over the config, the config wins over built-in defaults.
    /// Usage values are clamped into their accepted ranges.
    pub fn resolve(&self, config: &Config) -> Result<Settings> {
        let family = match self.family.as_deref().or(config.family.as_deref()) {
            Some(name) => pricing::find_family(name)?,
            None => pricing::default_family(),
        };

        // Picking a different family on the command line resets the config's
        // hand-edited rates, the same way choosing a preset does.
        // A config without `family` edits the default preset's rates.
        let configured_family = match config.family.as_deref() {
            Some(name) => pricing::lookup(name),
            None => Some(pricing::default_family()),
        };
        let family_switched =
            self.family.is_some() && configured_family.map(|f| f.name) != Some(family.name);
        if family_switched && !config.rates.is_empty() {
            tracing::info!(
                family = family.name,
                "--family differs from config, ignoring configured rates"
            );
        }

        let flag_rates = self.rate_overrides();
        let rates = if family_switched {
            pricing::resolve_rates(family, &[&flag_rates])?
        } else {
            pricing::resolve_rates(family, &[&config.rates, &flag_rates])?
        };

        let defaults = UsageInputs::default();
        let inputs = UsageInputs {
            num_gpus: clamp_input(
                "gpus",
                self.gpus.or(config.inputs.gpus).unwrap_or(defaults.num_gpus),
                GPU_RANGE,
            ),
            daily_usage_hours: clamp_input(
                "hours",
                self.hours
                    .or(config.inputs.daily_hours)
                    .unwrap_or(defaults.daily_usage_hours),
                DAILY_HOURS_RANGE,
            ),
            workload_days_per_week: clamp_input(
                "days-per-week",
                self.days_per_week
                    .or(config.inputs.days_per_week)
                    .unwrap_or(defaults.workload_days_per_week),
                DAYS_PER_WEEK_RANGE,
            ),
            comparison_period_days: clamp_input(
                "period",
                self.period
                    .or(config.inputs.period_days)
                    .unwrap_or(defaults.comparison_period_days),
                PERIOD_RANGE,
            ),
        };

        Ok(Settings {
            family,
            rates,
            inputs,
            as_of: config.as_of,
        })
    }
}

fn clamp_input(name: &str, value: u32, range: RangeInclusive<u32>) -> u32 {
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        tracing::warn!(
            "{name} = {value} is outside {}..={}, using {clamped}",
            range.start(),
            range.end()
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gpucost").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn defaults_without_flags_or_config() {
        let settings = parse(&[]).resolve(&Config::default()).expect("settings");
        assert_eq!(settings.family.name, pricing::DEFAULT_FAMILY);
        assert_eq!(settings.inputs, UsageInputs::default());
        assert_eq!(settings.rates.on_demand, 11.06);
    }

    #[test]
    fn default_command_is_compare() {
        assert_eq!(parse(&[]).effective_command(), Command::Compare);
        assert_eq!(
            parse(&["watch", "--interval", "3"]).effective_command(),
            Command::Watch { interval: 3 }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["chart", "--gpus", "4", "--family", "a2-high"]);
        let settings = cli.resolve(&Config::default()).expect("settings");
        assert_eq!(settings.inputs.num_gpus, 4);
        assert_eq!(settings.family.name, "A2 High");
    }

    #[test]
    fn flags_beat_config() {
        let mut config = Config::default();
        config.inputs.gpus = Some(8);
        config.inputs.daily_hours = Some(12);
        config.rates.on_demand = Some(10.0);

        let settings = parse(&["--gpus", "2", "--on-demand", "9"])
            .resolve(&config)
            .expect("settings");

        assert_eq!(settings.inputs.num_gpus, 2);
        assert_eq!(settings.inputs.daily_usage_hours, 12);
        assert_eq!(settings.rates.on_demand, 9.0);
    }

    #[test]
    fn switching_family_drops_configured_rates() {
        let mut config = Config::default();
        config.family = Some("A3 High".to_string());
        config.rates.flex_start = Some(1.0);

        let same = parse(&["--family", "a3-high"]).resolve(&config).expect("settings");
        assert_eq!(same.rates.flex_start, 1.0);

        let switched = parse(&["--family", "A4"]).resolve(&config).expect("settings");
        assert_eq!(switched.rates.flex_start, 11.28);
    }

    #[test]
    fn switching_from_implicit_default_drops_configured_rates() {
        let mut config = Config::default();
        config.rates.flex_start = Some(1.0);

        let switched = parse(&["--family", "A4"]).resolve(&config).expect("settings");
        assert_eq!(switched.family.name, "A4");
        assert_eq!(switched.rates.flex_start, 11.28);

        let same = parse(&["--family", "h100-80gb"]).resolve(&config).expect("settings");
        assert_eq!(same.rates.flex_start, 1.0);

        let implicit = parse(&[]).resolve(&config).expect("settings");
        assert_eq!(implicit.rates.flex_start, 1.0);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let settings = parse(&["--gpus", "0", "--hours", "30", "--period", "14"])
            .resolve(&Config::default())
            .expect("settings");
        assert_eq!(settings.inputs.num_gpus, 1);
        assert_eq!(settings.inputs.daily_usage_hours, 24);
        assert_eq!(settings.inputs.comparison_period_days, 7);
    }

    #[test]
    fn unknown_family_is_an_error() {
        assert!(parse(&["--family", "tpu"]).resolve(&Config::default()).is_err());
    }

    #[test]
    fn negative_rate_is_an_error() {
        assert!(parse(&["--flex-start=-2"]).resolve(&Config::default()).is_err());
    }

    #[test]
    fn columns_modifiers() {
        assert_eq!(resolve_columns(None), DEFAULT_COLUMNS.to_vec());
        assert_eq!(
            resolve_columns(Some(vec!["+basis".into(), "-savings".into()])),
            vec!["model", "rate", "hours", "cost", "basis"]
        );
        assert_eq!(
            resolve_columns(Some(vec!["model".into(), "cost".into()])),
            vec!["model", "cost"]
        );
    }
}
