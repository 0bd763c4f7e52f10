use crate::report::{GaugeSpec, RiskReport, format_percent, format_prob};

pub const GAUGE_WIDTH: usize = 50;

pub fn render_report_text(report: &RiskReport) -> String {
    let mut out = String::new();

    out.push_str("Heart Disease Risk Prediction\n");
    out.push_str("=============================\n\n");

    out.push_str("1. Patient inputs\n");
    for input in &report.inputs {
        match input.description {
            Some(desc) => out.push_str(&format!("{}: {} ({})\n", input.name, input.value, desc)),
            None => out.push_str(&format!("{}: {}\n", input.name, input.value)),
        }
    }
    out.push('\n');

    out.push_str("2. Model probabilities\n");
    out.push_str(&format!(
        "Logistic Regression: {}\nRandom Forest: {}\nCombined: {}\n\n",
        format_prob(report.probabilities.logistic_regression),
        format_prob(report.probabilities.random_forest),
        format_prob(report.probabilities.combined)
    ));

    out.push_str(&format!("Prediction Result: {}\n", report.label));
    out.push_str(&format!("{}: {}\n\n", report.headline, report.advisory));

    out.push_str("3. Risk level visualization\n");
    out.push_str(&format!("{}\n", report.gauge.title));
    out.push_str(&render_gauge(&report.gauge, GAUGE_WIDTH));

    if !report.warnings.is_empty() {
        out.push_str("\nWarnings\n");
        for w in &report.warnings {
            out.push_str(&format!("- {}\n", w));
        }
    }

    out
}

pub fn render_gauge(gauge: &GaugeSpec, width: usize) -> String {
    let span = gauge.axis[1] - gauge.axis[0];
    let mut bar = String::from("|");
    let mut scale = format!("{}", gauge.axis[0] as u32);
    let mut col = 0usize;

    for step in &gauge.steps {
        let end = (((step.range[1] - gauge.axis[0]) / span) * width as f64).round() as usize;
        while col < end.min(width) {
            let mid = gauge.axis[0] + (col as f64 + 0.5) * span / width as f64;
            bar.push(if mid <= gauge.value { '#' } else { '.' });
            col += 1;
        }
        bar.push('|');

        let label = format!("{}", step.range[1].round() as u32);
        while scale.len() + label.len() < bar.len() {
            scale.push(' ');
        }
        scale.push_str(&label);
    }

    format!(
        "{}  {} ({})\n{}\n",
        bar,
        format_percent(gauge.value / 100.0),
        gauge.bar_color,
        scale
    )
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
