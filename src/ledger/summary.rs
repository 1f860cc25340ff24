//! Ledger summary report
//!
//! Bundles every aggregate view for one scope so the CLI can print it or
//! write it out as CSV.

use std::io::Write;

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::display::chart::pie_slices;
use crate::display::report::{format_bar, format_header, format_percentage, percentage_of};
use crate::error::{TripError, TripResult};
use crate::models::{money::format_units, CurrencySettings, ExpenseRecord};

use super::{
    aggregate_by_category, aggregate_by_traveler, convert, filter_by_scope, settle,
    suggest_transfers, total, LedgerLine, Scope, Transfer, TravelerBalance, AMOUNT_EPSILON,
};

const BAR_WIDTH: usize = 20;

/// All aggregate views of the ledger for one scope
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub scope: Scope,
    pub expense_count: usize,
    /// Total in local currency
    pub total: f64,
    /// Total in home currency, when a rate is configured
    pub converted_total: Option<f64>,
    pub by_category: Vec<LedgerLine>,
    pub by_traveler: Vec<LedgerLine>,
    pub balances: Vec<TravelerBalance>,
    pub transfers: Vec<Transfer>,
    pub currency: CurrencySettings,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Home")]
    home: String,
    #[tabled(rename = "%")]
    percentage: String,
    #[tabled(rename = "Chart")]
    bar: String,
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Traveler")]
    traveler: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Net")]
    net: String,
}

impl LedgerSummary {
    /// Compute the summary for `scope`
    pub fn generate(
        records: &[ExpenseRecord],
        travelers: &[String],
        scope: Scope,
        currency: &CurrencySettings,
    ) -> Self {
        let scoped = filter_by_scope(records, scope);
        let total = total(&scoped);
        let balances = settle(&scoped, travelers);
        let transfers = suggest_transfers(&balances, AMOUNT_EPSILON);

        Self {
            scope,
            expense_count: scoped.len(),
            total,
            converted_total: convert(total, currency.rate),
            by_category: aggregate_by_category(&scoped),
            by_traveler: aggregate_by_traveler(&scoped, travelers),
            balances,
            transfers,
            currency: currency.clone(),
        }
    }

    /// Traveler lines for display, optionally without zero totals
    pub fn traveler_lines(&self, hide_zero: bool) -> Vec<&LedgerLine> {
        self.by_traveler
            .iter()
            .filter(|line| !(hide_zero && line.is_zero()))
            .collect()
    }

    fn home(&self, amount: f64) -> String {
        convert(amount, self.currency.rate)
            .map(|v| format_units(v, &self.currency.symbol))
            .unwrap_or_else(|| "-".to_string())
    }

    fn breakdown_table(&self, lines: &[&LedgerLine], local_symbol: &str) -> String {
        let max = lines.iter().map(|l| l.total).fold(0.0, f64::max);
        let rows: Vec<BreakdownRow> = lines
            .iter()
            .map(|line| BreakdownRow {
                label: line.label.clone(),
                amount: format_units(line.total, local_symbol),
                home: self.home(line.total),
                percentage: format_percentage(percentage_of(line.total, self.total)),
                bar: format_bar(line.total, max, BAR_WIDTH),
            })
            .collect();
        Table::new(rows).with(Style::rounded()).to_string()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, local_symbol: &str, hide_zero_travelers: bool) -> String {
        let mut output = String::new();

        output.push_str(&format_header(&format!("Ledger: {}", self.scope), 60));
        output.push_str(&format!("Expenses: {}\n", self.expense_count));
        output.push_str(&format!("Total:    {}", format_units(self.total, local_symbol)));
        match self.converted_total {
            Some(home) => output.push_str(&format!(
                " (≈ {} {})\n",
                format_units(home, &self.currency.symbol),
                self.currency.code
            )),
            None => output.push_str(" (no exchange rate set)\n"),
        }

        if self.expense_count == 0 {
            output.push_str("\nNo expenses in this scope.\n");
            return output;
        }

        output.push_str("\nBy category\n");
        let categories: Vec<&LedgerLine> = self.by_category.iter().collect();
        output.push_str(&self.breakdown_table(&categories, local_symbol));
        output.push('\n');

        let slices = pie_slices(&self.by_category);
        if !slices.is_empty() {
            let wedges: Vec<String> = slices
                .iter()
                .map(|s| format!("{} {:.0}°", s.label, s.end_angle - s.start_angle))
                .collect();
            output.push_str(&format!("Pie: {}\n", wedges.join(" | ")));
        }

        output.push_str("\nBy traveler\n");
        output.push_str(&self.breakdown_table(&self.traveler_lines(hide_zero_travelers), local_symbol));
        output.push('\n');

        output.push_str("\nBalances\n");
        let rows: Vec<BalanceRow> = self
            .balances
            .iter()
            .map(|b| BalanceRow {
                traveler: b.traveler.clone(),
                paid: format_units(b.paid, local_symbol),
                share: format_units(b.share, local_symbol),
                net: format_units(b.net, local_symbol),
            })
            .collect();
        output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        output.push('\n');

        if !self.transfers.is_empty() {
            output.push_str("\nTo settle up\n");
            for t in &self.transfers {
                output.push_str(&format!(
                    "  {} -> {}: {}\n",
                    t.from,
                    t.to,
                    format_units(t.amount, local_symbol)
                ));
            }
        }

        output
    }

    /// Export the aggregate lines to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> TripResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| TripError::Export(e.to_string());

        csv.write_record(["Scope", "Section", "Label", "Amount", "Home Amount"])
            .map_err(export_err)?;

        let scope = self.scope.to_string();
        let sections = [
            ("category", &self.by_category),
            ("traveler", &self.by_traveler),
        ];
        for (section, lines) in sections {
            for line in lines {
                let home = convert(line.total, self.currency.rate)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                csv.write_record([
                    scope.as_str(),
                    section,
                    line.label.as_str(),
                    format!("{:.2}", line.total).as_str(),
                    home.as_str(),
                ])
                .map_err(export_err)?;
            }
        }

        let home_total = self
            .converted_total
            .map(|v| v.to_string())
            .unwrap_or_default();
        csv.write_record([
            scope.as_str(),
            "total",
            "TOTAL",
            format!("{:.2}", self.total).as_str(),
            home_total.as_str(),
        ])
        .map_err(export_err)?;

        csv.flush().map_err(|e| TripError::Export(e.to_string()))?;
        Ok(())
    }
}
