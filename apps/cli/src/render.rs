//! # Output Rendering
//!
//! Plain text table for people, pretty JSON for scripts and the extension.
//!
//! ```text
//! Budget sharing, €14.00 per person, 3 participants
//!
//! Name            Order   Shared    Total     Over     Help     Pays  Status
//! Alice          €22.00    €1.00   €23.00    €9.00    €5.88    €3.12  pays
//! Bob            €17.00    €1.00   €18.00    €4.00    €2.62    €1.38  pays
//! Carol (you)     €4.50    €1.00    €5.50    €0.00    €0.00    €0.00  helps_others
//!
//! Grand total €46.50, company budget €42.00: over budget
//! Order creator: Carol (you)
//!
//! Transfers
//!   Alice -> Carol (you): €3.12
//!   Bob -> Carol (you): €1.38
//! ```

use std::fmt;

use tally_core::{DistributionResult, Money, ProportionalResult};

use crate::error::AppError;
use crate::state::{DisplayedResult, Report};

/// Pretty JSON of the displayed result.
pub fn render_json(displayed: &DisplayedResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(displayed)?)
}

/// Text table of the displayed result, via `Display`.
pub struct TextReport<'a>(pub &'a DisplayedResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let displayed = self.0;

        match &displayed.report {
            Report::BudgetSharing(result) => budget_sharing_table(f, displayed.budget, result)?,
            Report::Proportional(result) => proportional_table(f, displayed.budget, result)?,
        }

        if let Some(creator) = displayed.report.order_creator() {
            writeln!(f, "Order creator: {}", creator)?;
        }

        if !displayed.transfers.is_empty() {
            writeln!(f)?;
            writeln!(f, "Transfers")?;
            for transfer in &displayed.transfers {
                writeln!(f, "  {} -> {}: {}", transfer.from, transfer.to, transfer.amount)?;
            }
        }

        Ok(())
    }
}

/// Right-aligned money cell.
fn cell(amount: Money) -> String {
    format!("{:>9}", amount.to_string())
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(4)
}

fn budget_line(within_budget: bool) -> &'static str {
    if within_budget {
        "within budget"
    } else {
        "over budget"
    }
}

fn budget_sharing_table(
    f: &mut fmt::Formatter<'_>,
    budget: Money,
    result: &DistributionResult,
) -> fmt::Result {
    let breakdown = &result.breakdown;
    writeln!(
        f,
        "Budget sharing, {} per person, {} participants",
        budget, breakdown.participant_count
    )?;
    writeln!(f)?;

    let width = name_width(result.participants.iter().map(|p| p.name.as_str()));
    writeln!(
        f,
        "{:<width$}{:>9}{:>9}{:>9}{:>9}{:>9}{:>9}  Status",
        "Name", "Order", "Shared", "Total", "Over", "Help", "Pays",
    )?;

    for p in &result.participants {
        writeln!(
            f,
            "{:<width$}{}{}{}{}{}{}  {}",
            p.name,
            cell(p.individual_order),
            cell(p.shared_costs),
            cell(p.total_cost),
            cell(p.over_budget),
            cell(p.budget_help_received),
            cell(p.final_payment),
            p.status,
        )?;
    }

    writeln!(f)?;
    writeln!(
        f,
        "Grand total {}, company budget {}: {}",
        breakdown.grand_total,
        breakdown.total_budget,
        budget_line(result.within_budget)
    )
}

fn proportional_table(
    f: &mut fmt::Formatter<'_>,
    budget: Money,
    result: &ProportionalResult,
) -> fmt::Result {
    writeln!(
        f,
        "Proportional, {} per person, {} participants",
        budget, result.participant_count
    )?;
    writeln!(f)?;

    let width = name_width(result.shares.iter().map(|s| s.name.as_str()));
    writeln!(f, "{:<width$}{:>9}{:>9}{:>9}", "Name", "Order", "Share", "Pays")?;

    for share in &result.shares {
        let share_pct = format!("{:.1}%", share.spend_ratio * 100.0);
        let marker = if share.received_remainder { " *" } else { "" };
        writeln!(
            f,
            "{:<width$}{}{:>9}{}{}",
            share.name,
            cell(share.individual_order),
            share_pct,
            cell(share.payment),
            marker,
        )?;
    }

    writeln!(f)?;
    write!(
        f,
        "Grand total {}, company budget {}: {}",
        result.grand_total,
        result.total_budget,
        budget_line(result.within_budget)
    )?;
    if result.excess.is_positive() {
        write!(f, " by {}", result.excess)?;
    }
    writeln!(f)?;

    if result.shares.iter().any(|s| s.received_remainder) {
        writeln!(f, "* includes the rounding remainder")?;
    }

    Ok(())
}
