use std::io::stdout;

use anyhow::Result;
use crossterm::execute;
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup, Block},
    Terminal, TerminalOptions, Viewport,
};

use crate::output::format_usd;
use crate::types::{CostResult, PricingModel};

pub fn model_color(model: PricingModel) -> Color {
    match model {
        PricingModel::FlexStart => Color::Rgb(0x10, 0xB9, 0x81),
        PricingModel::OnDemand => Color::Rgb(0xF5, 0x9E, 0x0B),
        PricingModel::OneYearCud => Color::Rgb(0x3B, 0x82, 0xF6),
        PricingModel::ThreeYearCud => Color::Rgb(0x8B, 0x5C, 0xF6),
    }
}

/// Bar heights in whole cents so small totals still get a visible bar.
fn bar_value(cost: f64) -> u64 {
    if cost.is_finite() && cost > 0.0 {
        (cost * 100.0).round() as u64
    } else {
        0
    }
}

fn bars(result: &CostResult) -> Vec<Bar<'static>> {
    result
        .sorted()
        .iter()
        .map(|c| {
            Bar::default()
                .value(bar_value(c.total_cost))
                .text_value(format_usd(c.total_cost))
                .label(c.model.label().into())
                .style(Style::default().fg(model_color(c.model)))
        })
        .collect()
}

pub fn render(result: &CostResult) -> Result<()> {
    let bars = bars(result);

    let title = format!(
        "Total cost over {} day(s), cheapest first",
        result.comparison_period_days
    );

    let chart = BarChart::default()
        .block(Block::bordered().title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(3)
        .value_style(Style::default().fg(Color::White))
        .label_style(Style::default().fg(Color::DarkGray));

    let chart_height: u16 = 17; // 15 for bars + 2 for border

    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(chart_height),
        },
    )?;

    terminal.draw(|frame| {
        frame.render_widget(chart, frame.area());
    })?;

    // Move cursor below the chart
    execute!(stdout(), crossterm::cursor::MoveDown(1))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::compute_costs;
    use crate::pricing;
    use crate::types::UsageInputs;

    #[test]
    fn bar_values_are_cents() {
        assert_eq!(bar_value(442.4), 44_240);
        assert_eq!(bar_value(0.004), 0);
        assert_eq!(bar_value(-1.0), 0);
        assert_eq!(bar_value(f64::NAN), 0);
    }

    #[test]
    fn one_bar_per_model() {
        let result = compute_costs(&UsageInputs::default(), &pricing::default_family().rates);
        assert_eq!(bars(&result).len(), PricingModel::ALL.len());
    }

    #[test]
    fn colors_are_distinct() {
        let mut colors: Vec<String> = PricingModel::ALL
            .iter()
            .map(|m| format!("{:?}", model_color(*m)))
            .collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 4);
    }
}
