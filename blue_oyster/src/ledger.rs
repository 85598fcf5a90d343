//! In-memory sales ledger
//!
//! Expense entries for the current console session. Nothing here touches
//! the network or disk; rows live only as long as the process and are
//! addressed by their position in the list.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Expense category of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    Electronics,
    Furniture,
    Books,
    Clothing,
    Groceries,
}

impl ExpenseCategory {
    /// All categories, in the order the entry form offers them
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Electronics,
        ExpenseCategory::Furniture,
        ExpenseCategory::Books,
        ExpenseCategory::Clothing,
        ExpenseCategory::Groceries,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Electronics => "Electronics",
            ExpenseCategory::Furniture => "Furniture",
            ExpenseCategory::Books => "Books",
            ExpenseCategory::Clothing => "Clothing",
            ExpenseCategory::Groceries => "Groceries",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment method of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    PayPal,
    Cash,
}

impl PaymentMethod {
    /// All payment methods, in the order the entry form offers them
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::PayPal,
        PaymentMethod::Cash,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One expense row
///
/// `amount` stays the text the operator typed; it is only parsed when the
/// chart aggregates, and text that is not a number counts as zero there.
/// `date` is ISO `YYYY-MM-DD` text, validated at the form boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleEntry {
    pub name: String,
    pub email: String,
    pub amount: String,
    pub category: ExpenseCategory,
    pub date: String,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub receipt_link: String,
}

/// Session-scoped list of expense entries
///
/// Rows have no identifier; every operation addresses a position. Callers
/// that hold an index across a prepend or delete are pointing at a
/// different row afterwards, so the console resolves the index at the
/// moment it acts.
#[derive(Debug, Default)]
pub struct SalesLedger {
    entries: Vec<SaleEntry>,
}

impl SalesLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-filled with the two demo rows the console ships with
    pub fn with_demo_entries() -> Self {
        Self {
            entries: vec![
                SaleEntry {
                    name: "Olivia Martin".to_string(),
                    email: "olivia.martin@email.com".to_string(),
                    amount: "50001".to_string(),
                    category: ExpenseCategory::Electronics,
                    date: "2023-10-01".to_string(),
                    description: "Laptop Purchase".to_string(),
                    payment_method: PaymentMethod::CreditCard,
                    receipt_link: "https://example.com/receipt1".to_string(),
                },
                SaleEntry {
                    name: "Jackson Lee".to_string(),
                    email: "jackson.lee@email.com".to_string(),
                    amount: "50002".to_string(),
                    category: ExpenseCategory::Furniture,
                    date: "2023-10-02".to_string(),
                    description: "Office Chair".to_string(),
                    payment_method: PaymentMethod::PayPal,
                    receipt_link: "https://example.com/receipt2".to_string(),
                },
            ],
        }
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[SaleEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a submitted entry
    ///
    /// With `editing` set, the entry replaces the row at that position;
    /// a stale out-of-range position drops the submission. Without it,
    /// the entry is prepended so the newest row sits on top.
    pub fn submit(&mut self, entry: SaleEntry, editing: Option<usize>) {
        match editing {
            Some(index) if index < self.entries.len() => self.entries[index] = entry,
            Some(_) => {}
            None => self.entries.insert(0, entry),
        }
    }

    /// Delete the row at `index`; out-of-range is a no-op
    pub fn delete(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    /// Sum of amounts per category, in first-seen entry order
    ///
    /// Amounts that do not parse as a decimal count as zero, so one bad
    /// row cannot poison the chart.
    pub fn category_totals(&self) -> Vec<(ExpenseCategory, Decimal)> {
        let mut totals: Vec<(ExpenseCategory, Decimal)> = Vec::new();
        for entry in &self.entries {
            let amount = Decimal::from_str(entry.amount.trim()).unwrap_or(Decimal::ZERO);
            match totals.iter_mut().find(|(c, _)| *c == entry.category) {
                Some((_, total)) => *total += amount,
                None => totals.push((entry.category, amount)),
            }
        }
        totals
    }
}
