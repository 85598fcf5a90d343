//! Console application state
//!
//! One `App` owns every piece of mutable state: the table registry, the
//! sales ledger, which screen is showing, and whichever modal form holds
//! the keyboard. The event loop feeds it key events and drains settled
//! fetch outcomes between frames, so all mutation happens on one thread.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use oyster_client::{FetchResult, HttpClient, TableRegistry};
use ratatui::widgets::TableState;
use shared::Table;
use tokio::sync::mpsc;
use tui_logger::{TuiWidgetEvent, TuiWidgetState};

use crate::form::{FormOutcome, SaleForm, TableForm};
use crate::ledger::SalesLedger;

/// Columns in the table card grid
pub const TABLE_GRID_COLUMNS: usize = 4;

/// Top-level screens, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Sales,
    Tables,
    Logs,
}

impl Screen {
    /// All screens, in tab order
    pub const ALL: [Screen; 3] = [Screen::Sales, Screen::Tables, Screen::Logs];

    /// Tab title
    pub fn title(self) -> &'static str {
        match self {
            Screen::Sales => "Sales",
            Screen::Tables => "Tables",
            Screen::Logs => "Logs",
        }
    }

    /// Position in the tab bar
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Who owns the keyboard
#[derive(Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    SaleForm(SaleForm),
    TableForm(TableForm),
}

/// Application state
pub struct App {
    pub client: HttpClient,
    pub registry: TableRegistry,
    pub ledger: SalesLedger,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub sales_state: TableState,
    pub tables_selected: usize,
    pub logger_state: TuiWidgetState,
    pub status: Option<String>,
    pub should_quit: bool,
    fetch_tx: mpsc::Sender<FetchResult<Vec<Table>>>,
    fetch_rx: mpsc::Receiver<FetchResult<Vec<Table>>>,
}

impl App {
    /// Fresh console state with the demo ledger rows
    pub fn new(client: HttpClient) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(8);
        let mut sales_state = TableState::default();
        sales_state.select(Some(0));

        Self {
            client,
            registry: TableRegistry::new(),
            ledger: SalesLedger::with_demo_entries(),
            screen: Screen::default(),
            input_mode: InputMode::default(),
            sales_state,
            tables_selected: 0,
            logger_state: TuiWidgetState::new(),
            status: None,
            should_quit: false,
            fetch_tx,
            fetch_rx,
        }
    }

    /// Dispatch a table fetch without blocking the event loop
    ///
    /// The registry flips to loading before this returns; the response
    /// comes back through the fetch channel and lands in `poll_fetch`.
    /// Dispatching again while a fetch is in flight is allowed, outcomes
    /// then apply in arrival order.
    pub fn dispatch_fetch(&mut self) {
        self.registry.fetch_started();
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = client.fetch_tables().await;
            // Send fails only when the app is already shutting down
            let _ = tx.send(outcome).await;
        });
    }

    /// Drain settled fetch outcomes into the registry
    pub fn poll_fetch(&mut self) {
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.registry.fetch_settled(outcome);
            let len = self.registry.tables().len();
            self.tables_selected = self.tables_selected.min(len.saturating_sub(1));
            self.status = match self.registry.error() {
                Some(e) => Some(format!("table fetch failed: {e}")),
                None => Some(format!("loaded {len} tables")),
            };
        }
    }

    /// Apply one key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return;
        }
        match std::mem::take(&mut self.input_mode) {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::SaleForm(mut form) => match form.handle_key(key) {
                FormOutcome::Active => self.input_mode = InputMode::SaleForm(form),
                FormOutcome::Cancel => {}
                FormOutcome::Submit => {
                    let editing = form.editing();
                    self.ledger.submit(form.entry(), editing);
                    self.sales_state.select(Some(editing.unwrap_or(0)));
                    self.status = Some(match editing {
                        Some(_) => "entry updated".to_string(),
                        None => "entry created".to_string(),
                    });
                }
            },
            InputMode::TableForm(mut form) => match form.handle_key(key) {
                FormOutcome::Active => self.input_mode = InputMode::TableForm(form),
                FormOutcome::Cancel => {}
                FormOutcome::Submit => {
                    let table = form.table();
                    let name = table.name.clone();
                    self.registry.add_table(table);
                    self.tables_selected = self.registry.tables().len() - 1;
                    self.status = Some(format!("added table {name}"));
                }
            },
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.screen = self.screen.next(),
            KeyCode::BackTab => self.screen = self.screen.prev(),
            _ => match self.screen {
                Screen::Sales => self.handle_sales_key(key),
                Screen::Tables => self.handle_tables_key(key),
                Screen::Logs => self.handle_logs_key(key),
            },
        }
    }

    fn handle_sales_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.move_sales_selection(-1),
            KeyCode::Down => self.move_sales_selection(1),
            KeyCode::Char('c') => {
                self.input_mode = InputMode::SaleForm(SaleForm::create());
            }
            KeyCode::Char('e') => {
                if let Some(index) = self.sales_state.selected() {
                    if let Some(entry) = self.ledger.entries().get(index) {
                        self.input_mode = InputMode::SaleForm(SaleForm::edit(index, entry));
                    }
                }
            }
            KeyCode::Char('x') => {
                if let Some(index) = self.sales_state.selected() {
                    if index < self.ledger.len() {
                        self.ledger.delete(index);
                        self.status = Some("entry deleted".to_string());
                        self.clamp_sales_selection();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_tables_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.move_table_selection(-1),
            KeyCode::Right => self.move_table_selection(1),
            KeyCode::Up => self.move_table_selection(-(TABLE_GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_table_selection(TABLE_GRID_COLUMNS as isize),
            KeyCode::Char('r') => {
                self.dispatch_fetch();
                self.status = Some("refreshing tables".to_string());
            }
            KeyCode::Char('a') => {
                self.input_mode = InputMode::TableForm(TableForm::new());
            }
            KeyCode::Char('x') => {
                if let Some(table) = self.registry.tables().get(self.tables_selected) {
                    let id = table.id.clone();
                    let name = table.name.clone();
                    self.registry.remove_table(&id);
                    self.tables_selected = self
                        .tables_selected
                        .min(self.registry.tables().len().saturating_sub(1));
                    self.status = Some(format!("removed table {name}"));
                }
            }
            KeyCode::Char('o') => {
                if let Some(table) = self.registry.tables().get(self.tables_selected) {
                    let mut updated = table.clone();
                    updated.is_occupied = !updated.is_occupied;
                    let name = updated.name.clone();
                    let occupied = updated.is_occupied;
                    self.registry.update_table(updated);
                    self.status = Some(if occupied {
                        format!("{name} marked occupied")
                    } else {
                        format!("{name} marked free")
                    });
                }
            }
            KeyCode::Enter => {
                // Only occupied tables expose their orders route
                if let Some(table) = self.registry.tables().get(self.tables_selected) {
                    if table.is_occupied {
                        let route = format!("/table/{}", table.id);
                        tracing::info!(table = %table.name, route = %route, "orders route selected");
                        self.status = Some(format!("view orders: {route}"));
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::PageUp => self.logger_state.transition(TuiWidgetEvent::PrevPageKey),
            KeyCode::PageDown => self.logger_state.transition(TuiWidgetEvent::NextPageKey),
            KeyCode::Up => self.logger_state.transition(TuiWidgetEvent::UpKey),
            KeyCode::Down => self.logger_state.transition(TuiWidgetEvent::DownKey),
            _ => {}
        }
    }

    fn move_sales_selection(&mut self, delta: isize) {
        let len = self.ledger.len();
        if len == 0 {
            self.sales_state.select(None);
            return;
        }
        let current = self.sales_state.selected().unwrap_or(0).min(len - 1) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.sales_state.select(Some(next));
    }

    fn clamp_sales_selection(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            self.sales_state.select(None);
        } else {
            let selected = self.sales_state.selected().unwrap_or(0).min(len - 1);
            self.sales_state.select(Some(selected));
        }
    }

    fn move_table_selection(&mut self, delta: isize) {
        let len = self.registry.tables().len();
        if len == 0 {
            return;
        }
        let current = self.tables_selected.min(len - 1) as isize;
        self.tables_selected = (current + delta).clamp(0, len as isize - 1) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use oyster_client::ClientConfig;

    fn app() -> App {
        App::new(ClientConfig::default().build_client())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn seed_table(app: &mut App, id: &str, name: &str, occupied: bool) {
        app.registry.add_table(Table {
            id: id.to_string(),
            name: name.to_string(),
            is_occupied: occupied,
            qr_code: String::new(),
        });
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.screen, Screen::Sales);
        assert_eq!(app.ledger.len(), 2);
        assert!(app.registry.tables().is_empty());
        assert!(!app.registry.is_loading());
    }

    #[test]
    fn test_tab_cycles_screens() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::Tables);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::Logs);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::Sales);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.screen, Screen::Logs);
    }

    #[test]
    fn test_q_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_create_entry_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert!(matches!(app.input_mode, InputMode::SaleForm(_)));

        type_str(&mut app, "Ava Chen");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "ava@example.com");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2024-01-15");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Desk");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "120");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.ledger.len(), 3);
        assert_eq!(app.ledger.entries()[0].name, "Ava Chen");
        assert_eq!(app.sales_state.selected(), Some(0));
    }

    #[test]
    fn test_edit_entry_replaces_selected_row() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('e'));

        let InputMode::SaleForm(form) = &app.input_mode else {
            panic!("expected the sale form to open");
        };
        assert_eq!(form.editing(), Some(1));
        assert_eq!(form.name.value(), "Jackson Lee");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ledger.len(), 2);
        assert_eq!(app.ledger.entries()[1].name, "Jackson Lee");
        assert_eq!(app.sales_state.selected(), Some(1));
    }

    #[test]
    fn test_delete_clamps_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('x'));

        assert_eq!(app.ledger.len(), 1);
        assert_eq!(app.sales_state.selected(), Some(0));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.ledger.is_empty());
        assert_eq!(app.sales_state.selected(), None);
    }

    #[test]
    fn test_form_cancel_leaves_ledger_untouched() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        type_str(&mut app, "Half-typed");
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.ledger.len(), 2);
    }

    #[test]
    fn test_toggle_and_remove_table() {
        let mut app = app();
        seed_table(&mut app, "1", "Window 1", false);
        seed_table(&mut app, "2", "Window 2", false);
        press(&mut app, KeyCode::Tab);

        press(&mut app, KeyCode::Char('o'));
        assert!(app.registry.tables()[0].is_occupied);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.registry.tables().len(), 1);
        assert_eq!(app.registry.tables()[0].id, "2");
        assert_eq!(app.tables_selected, 0);
    }

    #[test]
    fn test_add_table_via_form() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.input_mode, InputMode::TableForm(_)));

        type_str(&mut app, "Patio 9");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.registry.tables().len(), 1);
        assert_eq!(app.registry.tables()[0].name, "Patio 9");
        assert!(!app.registry.tables()[0].is_occupied);
    }

    #[test]
    fn test_enter_routes_only_occupied_tables() {
        let mut app = app();
        seed_table(&mut app, "3", "Patio 3", true);
        seed_table(&mut app, "4", "Patio 4", false);
        press(&mut app, KeyCode::Tab);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status.as_deref(), Some("view orders: /table/3"));

        app.status = None;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_grid_navigation_clamps() {
        let mut app = app();
        for i in 0..6 {
            seed_table(&mut app, &i.to_string(), &format!("T{i}"), false);
        }
        press(&mut app, KeyCode::Tab);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.tables_selected, 4);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.tables_selected, 5);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.tables_selected, 5);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.tables_selected, 1);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.tables_selected, 0);
    }

    #[tokio::test]
    async fn test_dispatch_fetch_raises_loading_synchronously() {
        let mut app = app();
        app.dispatch_fetch();
        assert!(app.registry.is_loading());
    }
}
