use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};

use crate::cli::Settings;
use crate::pricing::FAMILIES;
use crate::types::{CostResult, ModelCost, PricingModel, SavingOutcome, Savings};

/// USD with two decimals and thousands separators: 1288.56 → "$1,288.56".
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Rates keep a third decimal when they have one (4.855), otherwise USD.
pub fn format_rate(rate: f64) -> String {
    let cents = rate * 100.0;
    if (cents - cents.round()).abs() > 1e-9 {
        format!("${rate:.3}")
    } else {
        format_usd(rate)
    }
}

pub fn format_gpu_hours(hours: f64) -> String {
    let plural = if hours == 1.0 { "" } else { "s" };
    format!("{hours:.1} GPU hour{plural}")
}

pub fn usage_description(model: PricingModel, result: &CostResult) -> String {
    if model.is_committed() {
        format!(
            "Based on 24/7 commitment for {} GPU(s) over {} day(s), totaling {}.",
            result.num_gpus,
            result.comparison_period_days,
            format_gpu_hours(result.cud_hours)
        )
    } else {
        format!(
            "Based on {} over {} day(s) within a {}-day period. (Pay-as-you-go)",
            format_gpu_hours(result.usage_hours),
            result.active_days,
            result.comparison_period_days
        )
    }
}

fn benefits(model: PricingModel) -> &'static [&'static str] {
    match model {
        PricingModel::FlexStart => &[
            "Pay only for actual GPU usage (vs. 24/7 CUDs).",
            "Discounted pricing vs. On-Demand for flexible start times.",
            "Improved resource obtainability; VMs run up to 7 days per instance.",
        ],
        PricingModel::OnDemand => {
            &["Highest flexibility, immediate start (when capacity available)."]
        }
        PricingModel::OneYearCud => {
            &["Discounted vs. On-Demand for committed 24/7 usage over 1 year."]
        }
        PricingModel::ThreeYearCud => &["Deepest discount for long-term, committed 24/7 usage."],
    }
}

fn considerations(model: PricingModel) -> &'static [&'static str] {
    match model {
        PricingModel::FlexStart => &[],
        PricingModel::OnDemand => &["Highest hourly cost."],
        PricingModel::OneYearCud => &[
            "Cost-effective if actual GPU utilization is consistently high.",
            "1-year commitment.",
        ],
        PricingModel::ThreeYearCud => &[
            "Best for very stable, long-term high utilization.",
            "3-year commitment.",
        ],
    }
}

fn column_header(col: &str) -> &str {
    match col {
        "model" => "Pricing Model",
        "rate" => "Rate / GPU / hr",
        "hours" => "GPU Hours",
        "cost" => "Total Cost",
        "savings" => "vs On-Demand",
        "basis" => "Billing",
        other => other,
    }
}

/// Relative difference to on-demand for the table's savings column.
fn savings_cell(model: PricingModel, savings: &Savings) -> String {
    if model == PricingModel::OnDemand {
        return "baseline".to_string();
    }
    let Savings::Compared(compared) = savings else {
        return "N/A".to_string();
    };
    match compared.iter().find(|s| s.model == model).map(|s| s.outcome) {
        Some(SavingOutcome::Saves { percent, .. }) => format!("-{percent:.1}%"),
        Some(SavingOutcome::CostsMore { percent, .. }) => format!("+{percent:.1}%"),
        Some(SavingOutcome::Same) => "0.0%".to_string(),
        None => "N/A".to_string(),
    }
}

fn cost_cell(col: &str, cost: &ModelCost, savings: &Savings) -> Cell {
    match col {
        "model" => Cell::new(cost.model.label()),
        "rate" => Cell::new(format_rate(cost.rate)).set_alignment(CellAlignment::Right),
        "hours" => Cell::new(format!("{:.1}", cost.hours)).set_alignment(CellAlignment::Right),
        "cost" => Cell::new(format_usd(cost.total_cost)).set_alignment(CellAlignment::Right),
        "savings" => {
            Cell::new(savings_cell(cost.model, savings)).set_alignment(CellAlignment::Right)
        }
        "basis" => Cell::new(if cost.model.is_committed() {
            "24/7 commitment"
        } else {
            "pay per use"
        }),
        _ => Cell::new(""),
    }
}

/// Comparison table, cheapest model first.
pub fn cost_table(result: &CostResult, columns: &[String]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(columns.iter().map(|c| Cell::new(column_header(c))));

    let savings = result.savings();
    for cost in result.sorted() {
        table.add_row(columns.iter().map(|c| cost_cell(c, &cost, &savings)));
    }

    table
}

pub fn cards(result: &CostResult) -> String {
    let mut out = String::new();

    for cost in result.sorted() {
        out.push_str(&format!(
            "{}  {}\n",
            cost.model.label(),
            format_usd(cost.total_cost)
        ));
        out.push_str(&format!("  Rate: {} / GPU / hr\n", format_rate(cost.rate)));
        out.push_str(&format!("  {}\n", usage_description(cost.model, result)));

        let benefits = benefits(cost.model);
        if !benefits.is_empty() {
            out.push_str("  Benefits:\n");
            for b in benefits {
                out.push_str(&format!("    • {b}\n"));
            }
        }
        let considerations = considerations(cost.model);
        if !considerations.is_empty() {
            out.push_str("  Considerations:\n");
            for c in considerations {
                out.push_str(&format!("    • {c}\n"));
            }
        }
        out.push('\n');
    }

    out
}

pub fn savings_lines(result: &CostResult) -> Vec<String> {
    let Savings::Compared(compared) = result.savings() else {
        let others_priced = result
            .costs
            .iter()
            .any(|c| c.model != PricingModel::OnDemand && c.total_cost > 0.0);
        let line = if others_priced {
            "No comparison available: on-demand cost is zero. Other models may have costs."
        } else {
            "No comparison available: enter a positive on-demand rate and usage to see savings."
        };
        return vec![line.to_string()];
    };

    compared
        .iter()
        .map(|s| {
            let label = s.model.label();
            match s.outcome {
                SavingOutcome::Saves { amount, percent } => {
                    format!("{label}: Save {} ({percent:.1}%)", format_usd(amount))
                }
                SavingOutcome::CostsMore { amount, percent } => format!(
                    "{label}: Costs {} more ({percent:.1}% more)",
                    format_usd(amount)
                ),
                SavingOutcome::Same => format!("{label}: Same cost as On-Demand"),
            }
        })
        .collect()
}

pub fn summary_line(settings: &Settings) -> String {
    let inputs = &settings.inputs;
    format!(
        "{} ({}) | {} GPU(s) | {} h/day | {} day(s)/week | {}-day period",
        settings.family.name,
        settings.family.description,
        inputs.num_gpus,
        inputs.daily_usage_hours,
        inputs.workload_days_per_week,
        inputs.comparison_period_days
    )
}

pub fn footer(settings: &Settings) -> String {
    let source = match settings.as_of {
        Some(date) => format!("Pricing data as of {date}."),
        None => format!("Pricing data: {} preset.", settings.family.name),
    };
    format!("{source} For estimation purposes only. Always check official GCP pricing.")
}

pub fn print_compare(settings: &Settings, result: &CostResult, columns: &[String]) {
    println!("{}", summary_line(settings));
    println!("{}", cost_table(result, columns));
    println!();
    print!("{}", cards(result));
    println!("{}", footer(settings));
}

pub fn print_cards(settings: &Settings, result: &CostResult) {
    println!("{}\n", summary_line(settings));
    print!("{}", cards(result));
    println!("{}", footer(settings));
}

pub fn print_savings(settings: &Settings, result: &CostResult) {
    println!("{}", summary_line(settings));
    println!("Savings vs. On-Demand:");
    for line in savings_lines(result) {
        println!("  {line}");
    }
    println!("Note: CUD costs are for 24/7 commitment, regardless of daily usage.");
}

pub fn families_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["Family", "GPU"]
            .into_iter()
            .chain(PricingModel::ALL.iter().map(|m| m.label()))
            .map(Cell::new),
    );

    for family in FAMILIES {
        let mut row = vec![Cell::new(family.name), Cell::new(family.description)];
        row.extend(PricingModel::ALL.iter().map(|m| {
            Cell::new(format_rate(family.rates.rate(*m))).set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }

    table
}

pub fn print_families() {
    println!("{}", families_table());
}

pub fn families_json() -> serde_json::Value {
    FAMILIES
        .iter()
        .map(|f| {
            serde_json::json!({
                "name": f.name,
                "description": f.description,
                "rates": f.rates,
            })
        })
        .collect()
}

pub fn print_families_json() {
    println!(
        "{}",
        serde_json::to_string_pretty(&families_json()).expect("JSON serialization failed")
    );
}

pub fn json_report(settings: &Settings, result: &CostResult) -> serde_json::Value {
    let costs: Vec<serde_json::Value> = result
        .sorted()
        .iter()
        .map(|c| {
            serde_json::json!({
                "model": c.model,
                "label": c.model.label(),
                "total_cost": c.total_cost,
                "hours": c.hours,
                "rate": c.rate,
                "description": usage_description(c.model, result),
            })
        })
        .collect();

    serde_json::json!({
        "family": settings.family.name,
        "as_of": settings.as_of,
        "inputs": settings.inputs,
        "rates": settings.rates,
        "active_days": result.active_days,
        "usage_hours": result.usage_hours,
        "cud_hours": result.cud_hours,
        "costs": costs,
        "savings": result.savings(),
    })
}

pub fn print_json(settings: &Settings, result: &CostResult) {
    println!(
        "{}",
        serde_json::to_string_pretty(&json_report(settings, result))
            .expect("JSON serialization failed")
    );
}
