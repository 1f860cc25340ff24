//! Expense service
//!
//! Validation and persistence for ledger entries. Aggregation lives in
//! [`crate::ledger`]; this layer only decides what may be recorded.

use tracing::{debug, info};

use crate::error::{TripError, TripResult};
use crate::ledger::{filter_by_scope, Scope};
use crate::models::{Amount, ExpenseRecord, Payer};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Input for recording an expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub day_index: u32,
    pub timeline_index: u32,
    pub item: String,
    pub category: Option<String>,
    /// Full amount, or the per-person amount for a go-dutch expense
    pub amount: Amount,
    pub payer: Payer,
    pub splitters: Vec<String>,
    pub note: Option<String>,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense
    ///
    /// A go-dutch payer is routed to [`Self::add_go_dutch`]. An empty
    /// splitter list defaults to the payer alone.
    pub fn add(&self, input: CreateExpenseInput) -> TripResult<ExpenseRecord> {
        if input.payer.is_go_dutch() {
            return self.add_go_dutch(input);
        }

        let (item, category) = self.validate_common(&input)?;

        let payer_name = input.payer.name().map(str::trim).unwrap_or_default();
        if payer_name.is_empty() {
            return Err(TripError::Validation("Payer name cannot be empty".into()));
        }

        let mut splitters = clean_names(&input.splitters);
        if splitters.is_empty() {
            splitters.push(payer_name.to_string());
        }

        let record = ExpenseRecord::new(
            input.day_index,
            input.timeline_index,
            item,
            category,
            input.amount,
            Payer::traveler(payer_name),
            splitters,
        )
        .with_note(input.note.unwrap_or_default());

        self.persist(record)
    }

    /// Record an expense each splitter paid for themselves
    ///
    /// `input.amount` is per person; the stored amount is multiplied by the
    /// number of splitters.
    pub fn add_go_dutch(&self, input: CreateExpenseInput) -> TripResult<ExpenseRecord> {
        let (item, category) = self.validate_common(&input)?;

        let splitters = clean_names(&input.splitters);
        if splitters.is_empty() {
            return Err(TripError::Validation(
                "A go-dutch expense needs at least one traveler to split with".into(),
            ));
        }

        let record = ExpenseRecord::go_dutch(
            input.day_index,
            input.timeline_index,
            item,
            category,
            input.amount,
            splitters,
        )
        .with_note(input.note.unwrap_or_default());

        self.persist(record)
    }

    /// Remove an expense by full id or unique prefix
    pub fn remove(&self, id_or_prefix: &str) -> TripResult<ExpenseRecord> {
        let matches = self.storage.expenses.find_by_prefix(id_or_prefix)?;

        let record = match matches.as_slice() {
            [] => return Err(TripError::expense_not_found(id_or_prefix)),
            [record] => record.clone(),
            _ => {
                return Err(TripError::Ambiguous {
                    entity_type: "Expense",
                    identifier: id_or_prefix.to_string(),
                })
            }
        };

        self.storage.expenses.remove(record.id)?;
        self.storage.expenses.save()?;
        info!(id = %record.id, item = %record.item, "removed expense");
        Ok(record)
    }

    /// Expenses within `scope`, in entry order
    pub fn list(&self, scope: Scope) -> TripResult<Vec<ExpenseRecord>> {
        let all = self.storage.expenses.get_all()?;
        Ok(filter_by_scope(&all, scope))
    }

    fn validate_common(&self, input: &CreateExpenseInput) -> TripResult<(String, String)> {
        let item = input.item.trim();
        if item.is_empty() {
            return Err(TripError::Validation("Item cannot be empty".into()));
        }

        let amount = input.amount.value();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TripError::Validation(format!(
                "Amount must be a positive number, got {}",
                amount
            )));
        }

        let basics = self.storage.load_basics()?.value;
        if basics.days > 0 && input.day_index >= basics.days {
            return Err(TripError::Validation(format!(
                "Day {} is outside the {}-day trip",
                input.day_index + 1,
                basics.days
            )));
        }

        let category = input
            .category
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "other".to_string());

        Ok((item.to_string(), category))
    }

    fn persist(&self, record: ExpenseRecord) -> TripResult<ExpenseRecord> {
        if !record.is_known_category() {
            debug!(category = %record.category, "custom category");
        }
        self.storage.expenses.insert(record.clone())?;
        self.storage.expenses.save()?;
        info!(id = %record.id, item = %record.item, amount = %record.amount, "recorded expense");
        Ok(record)
    }
}

fn clean_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TripPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_state().unwrap();
        (temp_dir, storage)
    }

    fn input(item: &str, amount: f64, payer: Payer, splitters: &[&str]) -> CreateExpenseInput {
        CreateExpenseInput {
            day_index: 0,
            timeline_index: 0,
            item: item.to_string(),
            category: Some("Food".to_string()),
            amount: Amount::new(amount),
            payer,
            splitters: splitters.iter().map(|s| s.to_string()).collect(),
            note: None,
        }
    }

    #[test]
    fn test_add_expense() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let record = service
            .add(input("  Ramen ", 300.0, Payer::traveler("A"), &["A", " ", "B"]))
            .unwrap();

        assert_eq!(record.item, "Ramen");
        assert_eq!(record.category, "food");
        assert_eq!(record.splitters, vec!["A", "B"]);

        storage.expenses.load().unwrap();
        assert_eq!(storage.expenses.count().unwrap(), 1);
    }

    #[test]
    fn test_splitters_default_to_payer() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let record = service.add(input("Taxi", 80.0, Payer::traveler("B"), &[])).unwrap();
        assert_eq!(record.splitters, vec!["B"]);
    }

    #[test]
    fn test_add_go_dutch_multiplies() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let record = service
            .add(input("Museum", 20.0, Payer::GoDutch, &["A", "B", "C"]))
            .unwrap();
        assert_eq!(record.amount.value(), 60.0);
        assert!(record.payer.is_go_dutch());

        let err = service.add(input("Museum", 20.0, Payer::GoDutch, &[])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        assert!(service.add(input("", 10.0, Payer::traveler("A"), &[])).unwrap_err().is_validation());
        assert!(service.add(input("x", 0.0, Payer::traveler("A"), &[])).unwrap_err().is_validation());
        assert!(service.add(input("x", f64::NAN, Payer::traveler("A"), &[])).unwrap_err().is_validation());
        assert!(service.add(input("x", 5.0, Payer::traveler(" "), &[])).unwrap_err().is_validation());

        let mut late = input("x", 5.0, Payer::traveler("A"), &[]);
        late.day_index = 5;
        assert!(service.add(late).unwrap_err().is_validation());
    }

    #[test]
    fn test_remove_by_prefix() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let record = service.add(input("Tea", 5.0, Payer::traveler("A"), &[])).unwrap();
        let err = service.remove("exp-zzzz").unwrap_err();
        assert!(err.is_not_found());

        let removed = service.remove(&record.id.to_string()).unwrap();
        assert_eq!(removed.id, record.id);
        assert!(service.list(Scope::Trip).unwrap().is_empty());
    }

    #[test]
    fn test_list_by_scope() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        service.add(input("Breakfast", 5.0, Payer::traveler("A"), &[])).unwrap();
        let mut later = input("Dinner", 50.0, Payer::traveler("A"), &[]);
        later.day_index = 2;
        service.add(later).unwrap();

        assert_eq!(service.list(Scope::Trip).unwrap().len(), 2);
        let day = service.list(Scope::Day(2)).unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].item, "Dinner");
    }
}
