//! Modal entry forms
//!
//! Keyboard-driven forms for expense entries and dining tables. A form
//! owns the keys while it is open: Tab/Down and BackTab/Up move focus,
//! Left/Right cycle the choice fields, Enter submits, Esc cancels.
//! Everything else goes to the focused text input.

use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::Table;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::ledger::{ExpenseCategory, PaymentMethod, SaleEntry};

/// What a keypress did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    /// Form stays open
    Active,
    /// Operator submitted a valid form
    Submit,
    /// Operator closed the form without submitting
    Cancel,
}

/// Focusable fields of the expense form, in visual order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleField {
    Name,
    Email,
    Date,
    Category,
    Description,
    Amount,
    Payment,
    Receipt,
}

impl SaleField {
    const ORDER: [SaleField; 8] = [
        SaleField::Name,
        SaleField::Email,
        SaleField::Date,
        SaleField::Category,
        SaleField::Description,
        SaleField::Amount,
        SaleField::Payment,
        SaleField::Receipt,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Label shown next to the field
    pub fn label(self) -> &'static str {
        match self {
            SaleField::Name => "Name",
            SaleField::Email => "Email",
            SaleField::Date => "Date",
            SaleField::Category => "Category",
            SaleField::Description => "Description",
            SaleField::Amount => "Amount",
            SaleField::Payment => "Payment Method",
            SaleField::Receipt => "Receipt Link",
        }
    }

    fn is_select(self) -> bool {
        matches!(self, SaleField::Category | SaleField::Payment)
    }
}

/// Expense entry form
#[derive(Debug)]
pub struct SaleForm {
    editing: Option<usize>,
    pub name: Input,
    pub email: Input,
    pub date: Input,
    pub category: usize,
    pub description: Input,
    pub amount: Input,
    pub payment: usize,
    pub receipt_link: Input,
    pub focus: SaleField,
    pub error: Option<String>,
}

impl SaleForm {
    /// Blank form for a new entry
    pub fn create() -> Self {
        Self {
            editing: None,
            name: Input::default(),
            email: Input::default(),
            date: Input::default(),
            category: 0,
            description: Input::default(),
            amount: Input::default(),
            payment: 0,
            receipt_link: Input::default(),
            focus: SaleField::Name,
            error: None,
        }
    }

    /// Form pre-filled from the row at `index`
    pub fn edit(index: usize, entry: &SaleEntry) -> Self {
        Self {
            editing: Some(index),
            name: Input::new(entry.name.clone()),
            email: Input::new(entry.email.clone()),
            date: Input::new(entry.date.clone()),
            category: ExpenseCategory::ALL
                .iter()
                .position(|c| *c == entry.category)
                .unwrap_or(0),
            description: Input::new(entry.description.clone()),
            amount: Input::new(entry.amount.clone()),
            payment: PaymentMethod::ALL
                .iter()
                .position(|p| *p == entry.payment_method)
                .unwrap_or(0),
            receipt_link: Input::new(entry.receipt_link.clone()),
            focus: SaleField::Name,
            error: None,
        }
    }

    /// Row being edited, `None` when creating
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Modal title
    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            " Edit Expense Entry "
        } else {
            " Create Expense Entry "
        }
    }

    /// Apply one keypress
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => match self.validate() {
                Some(message) => self.error = Some(message),
                None => return FormOutcome::Submit,
            },
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left if self.focus.is_select() => self.cycle_select(-1),
            KeyCode::Right if self.focus.is_select() => self.cycle_select(1),
            _ => {
                if let Some(input) = self.focused_input_mut() {
                    input.handle_event(&Event::Key(key));
                }
            }
        }
        FormOutcome::Active
    }

    /// Currently selected category
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::ALL[self.category % ExpenseCategory::ALL.len()]
    }

    /// Currently selected payment method
    pub fn payment_method(&self) -> PaymentMethod {
        PaymentMethod::ALL[self.payment % PaymentMethod::ALL.len()]
    }

    /// Text input owning the cursor, `None` on a choice field
    pub fn focused_input(&self) -> Option<&Input> {
        match self.focus {
            SaleField::Name => Some(&self.name),
            SaleField::Email => Some(&self.email),
            SaleField::Date => Some(&self.date),
            SaleField::Description => Some(&self.description),
            SaleField::Amount => Some(&self.amount),
            SaleField::Receipt => Some(&self.receipt_link),
            SaleField::Category | SaleField::Payment => None,
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut Input> {
        match self.focus {
            SaleField::Name => Some(&mut self.name),
            SaleField::Email => Some(&mut self.email),
            SaleField::Date => Some(&mut self.date),
            SaleField::Description => Some(&mut self.description),
            SaleField::Amount => Some(&mut self.amount),
            SaleField::Receipt => Some(&mut self.receipt_link),
            SaleField::Category | SaleField::Payment => None,
        }
    }

    fn cycle_select(&mut self, step: isize) {
        match self.focus {
            SaleField::Category => {
                let len = ExpenseCategory::ALL.len() as isize;
                self.category = ((self.category as isize + step + len) % len) as usize;
            }
            SaleField::Payment => {
                let len = PaymentMethod::ALL.len() as isize;
                self.payment = ((self.payment as isize + step + len) % len) as usize;
            }
            _ => {}
        }
    }

    fn validate(&self) -> Option<String> {
        if self.name.value().trim().is_empty() {
            return Some("Name is required".to_string());
        }
        if self.email.value().trim().is_empty() {
            return Some("Email is required".to_string());
        }
        let date = self.date.value().trim();
        if date.is_empty() {
            return Some("Date is required".to_string());
        }
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Some("Date must be YYYY-MM-DD".to_string());
        }
        if self.amount.value().trim().is_empty() {
            return Some("Amount is required".to_string());
        }
        None
    }

    /// Entry built from the current field values
    pub fn entry(&self) -> SaleEntry {
        SaleEntry {
            name: self.name.value().trim().to_string(),
            email: self.email.value().trim().to_string(),
            amount: self.amount.value().trim().to_string(),
            category: self.category(),
            date: self.date.value().trim().to_string(),
            description: self.description.value().to_string(),
            payment_method: self.payment_method(),
            receipt_link: self.receipt_link.value().trim().to_string(),
        }
    }
}

/// Focusable fields of the table form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableField {
    #[default]
    Name,
    QrCode,
}

/// New dining table form
#[derive(Debug, Default)]
pub struct TableForm {
    pub name: Input,
    pub qr_code: Input,
    pub focus: TableField,
    pub error: Option<String>,
}

impl TableForm {
    /// Blank form focused on the name field
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one keypress
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => {
                if self.name.value().trim().is_empty() {
                    self.error = Some("Table name is required".to_string());
                } else {
                    return FormOutcome::Submit;
                }
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                self.focus = match self.focus {
                    TableField::Name => TableField::QrCode,
                    TableField::QrCode => TableField::Name,
                };
            }
            _ => {
                let input = match self.focus {
                    TableField::Name => &mut self.name,
                    TableField::QrCode => &mut self.qr_code,
                };
                input.handle_event(&Event::Key(key));
            }
        }
        FormOutcome::Active
    }

    /// Text input owning the cursor
    pub fn focused_input(&self) -> &Input {
        match self.focus {
            TableField::Name => &self.name,
            TableField::QrCode => &self.qr_code,
        }
    }

    /// Table built from the current field values, with a fresh local id
    pub fn table(&self) -> Table {
        let mut table = Table::new(self.name.value().trim());
        table.qr_code = self.qr_code.value().trim().to_string();
        table
    }
}
