use anyhow::Result;
use clap::Parser;

use gpucost::cli::{self, Cli, Command, OutputFormat};
use gpucost::{config, graph, output, watch};

fn main() -> Result<()> {
    let cli = Cli::parse();
    gpucost::init_tracing(cli.verbose);

    let mode = cli.effective_command();

    match mode {
        Command::Families => {
            match cli.format {
                OutputFormat::Json => output::print_families_json(),
                OutputFormat::Table => output::print_families(),
            }
            return Ok(());
        }
        Command::Watch { interval } => return watch::run(&cli, interval),
        _ => {}
    }

    let config = config::load_config(cli.config.as_deref());
    let settings = cli.resolve(&config)?;
    let result = gpucost::compute_costs(&settings.inputs, &settings.rates);

    tracing::debug!(
        family = settings.family.name,
        active_days = result.active_days,
        usage_hours = result.usage_hours,
        cud_hours = result.cud_hours,
        "computed costs"
    );

    if cli.format == OutputFormat::Json {
        output::print_json(&settings, &result);
        return Ok(());
    }

    match mode {
        Command::Compare => {
            let columns = cli::resolve_columns(cli.columns.clone());
            output::print_compare(&settings, &result, &columns);
        }
        Command::Cards => output::print_cards(&settings, &result),
        Command::Savings => output::print_savings(&settings, &result),
        Command::Chart => {
            println!("{}", output::summary_line(&settings));
            graph::render(&result)?;
        }
        Command::Families | Command::Watch { .. } => unreachable!(),
    }

    Ok(())
}
