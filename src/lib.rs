pub mod cli;
pub mod config;
pub mod cost;
pub mod graph;
pub mod output;
pub mod pricing;
pub mod types;
pub mod watch;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use cost::{compute_active_days, compute_costs, RateTable};
pub use types::{CostResult, ModelCost, PricingModel, PricingRates, UsageInputs};

/// Initialize logging to stderr. `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "gpucost=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}
