//! Settlement balances: what each traveler paid versus what they consumed

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ExpenseRecord, Payer};

/// Paid, consumed and net amounts for one traveler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelerBalance {
    pub traveler: String,
    /// Money this traveler handed over
    pub paid: f64,
    /// Value this traveler consumed
    pub share: f64,
    /// `paid - share`; positive means the group owes this traveler
    pub net: f64,
}

impl TravelerBalance {
    fn new(traveler: &str) -> Self {
        Self {
            traveler: traveler.to_string(),
            paid: 0.0,
            share: 0.0,
            net: 0.0,
        }
    }
}

/// Compute per-traveler balances
///
/// A single payer is credited with the full amount; in a go-dutch expense each
/// splitter pays exactly their own share, so it nets to zero for everybody.
pub fn settle(records: &[ExpenseRecord], travelers: &[String]) -> Vec<TravelerBalance> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut balances: Vec<TravelerBalance> = Vec::new();

    let mut slot = |name: &str, balances: &mut Vec<TravelerBalance>| -> usize {
        *index.entry(name.to_string()).or_insert_with(|| {
            balances.push(TravelerBalance::new(name));
            balances.len() - 1
        })
    };

    for traveler in travelers {
        slot(traveler.as_str(), &mut balances);
    }

    for record in records {
        let share = record.split_share();
        let splitters = record.effective_splitters();

        match &record.payer {
            Payer::Traveler(name) => {
                let i = slot(name.as_str(), &mut balances);
                balances[i].paid += record.amount.effective();
            }
            Payer::GoDutch => {
                for splitter in splitters.iter().copied() {
                    let i = slot(splitter, &mut balances);
                    balances[i].paid += share;
                }
            }
        }

        for splitter in splitters.iter().copied() {
            let i = slot(splitter, &mut balances);
            balances[i].share += share;
        }
    }

    for balance in &mut balances {
        balance.net = balance.paid - balance.share;
    }
    balances
}

/// A suggested transfer that clears outstanding balances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Greedy debtor-to-creditor transfers that settle every balance
///
/// Amounts below `tolerance` are treated as settled.
pub fn suggest_transfers(balances: &[TravelerBalance], tolerance: f64) -> Vec<Transfer> {
    let mut creditors: Vec<(String, f64)> = balances
        .iter()
        .filter(|b| b.net > tolerance)
        .map(|b| (b.traveler.clone(), b.net))
        .collect();
    let mut debtors: Vec<(String, f64)> = balances
        .iter()
        .filter(|b| b.net < -tolerance)
        .map(|b| (b.traveler.clone(), -b.net))
        .collect();

    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut transfers = Vec::new();
    let (mut c, mut d) = (0, 0);
    while c < creditors.len() && d < debtors.len() {
        let amount = creditors[c].1.min(debtors[d].1);
        transfers.push(Transfer {
            from: debtors[d].0.clone(),
            to: creditors[c].0.clone(),
            amount,
        });
        creditors[c].1 -= amount;
        debtors[d].1 -= amount;
        if creditors[c].1 <= tolerance {
            c += 1;
        }
        if debtors[d].1 <= tolerance {
            d += 1;
        }
    }
    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_payer() {
        let records = vec![
            ExpenseRecord::new(0, 0, "Dinner", "food", Amount::new(300.0), Payer::traveler("A"), names(&["A", "B"])),
            ExpenseRecord::new(0, 1, "Taxi", "transport", Amount::new(120.0), Payer::traveler("A"), names(&["A"])),
        ];
        let balances = settle(&records, &names(&["A", "B"]));
        assert_eq!(balances[0].traveler, "A");
        assert_eq!(balances[0].paid, 420.0);
        assert_eq!(balances[0].share, 270.0);
        assert_eq!(balances[0].net, 150.0);
        assert_eq!(balances[1].net, -150.0);
    }

    #[test]
    fn test_go_dutch_nets_zero() {
        let records = vec![ExpenseRecord::go_dutch(0, 0, "Tickets", "tickets", Amount::new(25.0), names(&["A", "B", "C"]))];
        let balances = settle(&records, &names(&["A", "B", "C"]));
        for balance in &balances {
            assert_eq!(balance.paid, 25.0);
            assert_eq!(balance.net, 0.0);
        }
    }

    #[test]
    fn test_payer_outside_roster() {
        let records = vec![ExpenseRecord::new(0, 0, "Gift", "shopping", Amount::new(40.0), Payer::traveler("Host"), names(&["A"]))];
        let balances = settle(&records, &names(&["A"]));
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[1].traveler, "Host");
        assert_eq!(balances[1].net, 40.0);
    }

    #[test]
    fn test_suggest_transfers() {
        let records = vec![
            ExpenseRecord::new(0, 0, "Hotel", "other", Amount::new(300.0), Payer::traveler("A"), names(&["A", "B", "C"])),
        ];
        let balances = settle(&records, &names(&["A", "B", "C"]));
        let transfers = suggest_transfers(&balances, 0.005);
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.to == "A" && t.amount == 100.0));
    }

    #[test]
    fn test_no_transfers_when_settled() {
        let balances = settle(&[], &names(&["A", "B"]));
        assert!(suggest_transfers(&balances, 0.005).is_empty());
    }
}
