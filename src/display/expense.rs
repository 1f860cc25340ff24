//! Expense list formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::ExpenseRecord;

use super::report::truncate;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid by")]
    payer: String,
    #[tabled(rename = "Split")]
    splitters: String,
}

impl From<&ExpenseRecord> for ExpenseRow {
    fn from(record: &ExpenseRecord) -> Self {
        let item = match &record.note {
            Some(note) => format!("{} ({})", record.item, truncate(note, 20)),
            None => record.item.clone(),
        };
        Self {
            id: record.id.to_string(),
            day: format!("{}.{}", record.day_index + 1, record.timeline_index + 1),
            item: truncate(&item, 40),
            category: record.category.clone(),
            amount: record.amount.to_string(),
            payer: record.payer.to_string(),
            splitters: record.effective_splitters().join(", "),
        }
    }
}

/// Format expenses as a table
pub fn format_expense_list(records: &[ExpenseRecord]) -> String {
    if records.is_empty() {
        return "No expenses recorded.\n\nRun 'tripledger expense add' to record one.".to_string();
    }

    let rows: Vec<ExpenseRow> = records.iter().map(ExpenseRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format a single expense for confirmation output
pub fn format_expense_details(record: &ExpenseRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!("Expense:  {}\n", record.id));
    output.push_str(&format!("Item:     {}\n", record.item));
    output.push_str(&format!(
        "Day:      {} (entry {})\n",
        record.day_index + 1,
        record.timeline_index + 1
    ));
    output.push_str(&format!("Category: {}\n", record.category));
    output.push_str(&format!("Amount:   {}\n", record.amount));
    output.push_str(&format!("Paid by:  {}\n", record.payer));
    output.push_str(&format!(
        "Split:    {}\n",
        record.effective_splitters().join(", ")
    ));
    if let Some(note) = &record.note {
        output.push_str(&format!("Note:     {}\n", note));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Payer};

    #[test]
    fn test_empty_list() {
        assert!(format_expense_list(&[]).contains("No expenses"));
    }

    #[test]
    fn test_list_contains_rows() {
        let records = vec![ExpenseRecord::new(
            1,
            0,
            "Sushi",
            "food",
            Amount::new(4200.0),
            Payer::traveler("Ann"),
            vec!["Ann".into(), "Bo".into()],
        )];
        let table = format_expense_list(&records);
        assert!(table.contains("Sushi"));
        assert!(table.contains("2.1"));
        assert!(table.contains("Ann, Bo"));
        assert!(table.contains("4200"));
    }

    #[test]
    fn test_details_show_go_dutch() {
        let record = ExpenseRecord::go_dutch(0, 0, "Bus", "transport", Amount::new(3.0), vec!["A".into()])
            .with_note("day pass");
        let details = format_expense_details(&record);
        assert!(details.contains("Paid by:  go-dutch"));
        assert!(details.contains("Note:     day pass"));
    }
}
