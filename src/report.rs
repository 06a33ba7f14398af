//! Plain-text report of a wizard session.

use chrono::{DateTime, Utc};

use crate::models::{total_cost, Level, RiskCategory, Stage};
use crate::wizard::WizardState;

const HIGH: char = '●';
const MEDIUM: char = '○';
const LOW: char = '◇';

fn level_symbol(level: Level) -> char {
    match level {
        Level::High => HIGH,
        Level::Medium => MEDIUM,
        Level::Low => LOW,
    }
}

/// One line of a section plus its indented detail lines.
struct Branch {
    line: String,
    details: Vec<String>,
}

impl Branch {
    fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            details: Vec::new(),
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

/// Render branches with tree connectors.
///
/// ```text
/// ├── ● Payments
/// │   └── reasoning
/// └── ○ Reports
/// ```
fn render_branches(output: &mut String, branches: &[Branch]) {
    for (i, branch) in branches.iter().enumerate() {
        let is_last = i == branches.len() - 1;
        output.push_str(if is_last { "└── " } else { "├── " });
        output.push_str(&branch.line);
        output.push('\n');

        let continuation = if is_last { "    " } else { "│   " };
        for (j, detail) in branch.details.iter().enumerate() {
            let detail_is_last = j == branch.details.len() - 1;
            output.push_str(continuation);
            output.push_str(if detail_is_last { "└── " } else { "├── " });
            output.push_str(detail);
            output.push('\n');
        }
    }
}

fn section(output: &mut String, title: &str, branches: &[Branch]) {
    output.push('\n');
    output.push_str(title);
    output.push('\n');
    if branches.is_empty() {
        output.push_str("    (none)\n");
    } else {
        render_branches(output, branches);
    }
}

/// Format a USD amount with thousands separators: `$48,000`, `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (dollars, rem) = (cents / 100, cents % 100);

    let digits = dollars.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if rem == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{rem:02}")
    }
}

/// Render the report, stamped with the current time.
pub fn render(state: &WizardState) -> String {
    render_at(state, Utc::now())
}

pub fn render_at(state: &WizardState, generated_at: DateTime<Utc>) -> String {
    let results = &state.results;
    let mut output = format!(
        "Project scope ({})\nSession {} · step {}\n",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        state.session_id,
        state.current_step
    );
    if let Some(rate) = state.inputs.hourly_rate {
        output.push_str(&format!("Hourly rate: {}/h\n", format_usd(rate)));
    }

    let features: Vec<Branch> = results
        .features
        .iter()
        .map(|f| {
            let complexity = f
                .complexity
                .map(|c| format!(" [{}]", c.as_str()))
                .unwrap_or_default();
            Branch::new(format!("{} {}{}", f.id, f.title, complexity))
        })
        .collect();
    section(
        &mut output,
        &format!("Features ({})", features.len()),
        &features,
    );

    let priorities: Vec<Branch> = results
        .priorities
        .iter()
        .map(|p| {
            Branch::new(format!("{} {}", level_symbol(p.priority), p.feature)).detail(&p.reasoning)
        })
        .collect();
    section(&mut output, "Priorities", &priorities);

    output.push_str("\nRisks\n");
    if results.risks.is_empty() {
        output.push_str("    (none)\n");
    }
    for category in RiskCategory::ALL {
        let mut risks: Vec<_> = results
            .risks
            .iter()
            .filter(|r| r.category == category)
            .collect();
        if risks.is_empty() {
            continue;
        }
        risks.sort_by_key(|r| r.severity);
        let branches: Vec<Branch> = risks
            .iter()
            .map(|r| {
                Branch::new(format!("{} {}", level_symbol(r.severity), r.title))
                    .detail(format!("impact: {}", r.impact))
                    .detail(format!("mitigation: {}", r.mitigation))
            })
            .collect();
        output.push_str(category.as_str());
        output.push('\n');
        render_branches(&mut output, &branches);
    }

    let pocs: Vec<Branch> = results
        .poc_versions
        .iter()
        .map(|p| {
            let marker = if state.selected_poc.as_deref() == Some(p.id.as_str()) {
                " (selected)"
            } else {
                ""
            };
            Branch::new(format!(
                "{}: {} · {} · {}{}",
                p.focus.as_str(),
                p.title,
                p.time_estimate,
                format_usd(p.cost),
                marker
            ))
            .detail(format!("features: {}", p.features.join(", ")))
        })
        .collect();
    section(&mut output, "POC versions", &pocs);

    let deliverables: Vec<Branch> = results
        .mvp_deliverables
        .iter()
        .map(|d| {
            Branch::new(format!(
                "{} · {} · {}",
                d.title,
                d.time_estimate,
                format_usd(d.cost)
            ))
            .detail(&d.description)
        })
        .collect();
    section(&mut output, "MVP plan", &deliverables);
    if !results.mvp_deliverables.is_empty() {
        output.push_str(&format!(
            "Total: {}\n",
            format_usd(total_cost(&results.mvp_deliverables))
        ));
    }

    let placeholder: Vec<&str> = Stage::ALL
        .iter()
        .filter(|s| state.used_fallback(**s))
        .map(|s| s.label())
        .collect();
    if !placeholder.is_empty() || state.error.is_some() {
        output.push_str("\nNotices\n");
        for label in placeholder {
            output.push_str(&format!("- {label} shows placeholder data\n"));
        }
        if let Some(banner) = state.banner() {
            output.push_str(&format!("- {banner}\n"));
        }
    }

    output
}
