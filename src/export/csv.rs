//! CSV Export functionality
//!
//! Exports expense records to a spreadsheet-friendly CSV file.

use std::io::Write;

use crate::error::{TripError, TripResult};
use crate::models::ExpenseRecord;
use crate::storage::Storage;

/// Header row of the expense CSV
pub const EXPENSE_HEADER: [&str; 10] = [
    "ID",
    "Day",
    "Entry",
    "Item",
    "Category",
    "Amount",
    "Paid By",
    "Split With",
    "Note",
    "Created",
];

/// Write expense records as CSV
pub fn write_expenses_csv<W: Write>(records: &[ExpenseRecord], writer: W) -> TripResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| TripError::Export(e.to_string());

    csv.write_record(EXPENSE_HEADER).map_err(export_err)?;

    for record in records {
        let splitters = record.effective_splitters().join("; ");
        csv.write_record([
            record.id.as_uuid().to_string(),
            (record.day_index + 1).to_string(),
            (record.timeline_index + 1).to_string(),
            record.item.clone(),
            record.category.clone(),
            format!("{:.2}", record.amount.effective()),
            record.payer.to_string(),
            splitters,
            record.note.clone().unwrap_or_default(),
            record.created_at.to_rfc3339(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(|e| TripError::Export(e.to_string()))?;
    Ok(())
}

/// Export all stored expenses to CSV
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: W) -> TripResult<()> {
    let records = storage.expenses.get_all()?;
    write_expenses_csv(&records, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Payer};

    #[test]
    fn test_expense_csv() {
        let records = vec![
            ExpenseRecord::new(
                0,
                1,
                "Coffee, large",
                "food",
                Amount::new(4.5),
                Payer::traveler("Ann"),
                vec!["Ann".into(), "Bo".into()],
            )
            .with_note("said \"extra hot\""),
            ExpenseRecord::go_dutch(2, 0, "Ferry", "transport", Amount::new(10.0), vec!["Ann".into()]),
        ];

        let mut output = Vec::new();
        write_expenses_csv(&records, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID,Day,Entry,Item,Category,Amount,Paid By,Split With,Note,Created");
        assert!(lines[1].contains(",1,2,\"Coffee, large\",food,4.50,Ann,Ann; Bo,\"said \"\"extra hot\"\"\","));
        assert!(lines[2].contains(",3,1,Ferry,transport,10.00,go-dutch,Ann,,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_csv_has_header() {
        let mut output = Vec::new();
        write_expenses_csv(&[], &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 1);
    }
}
