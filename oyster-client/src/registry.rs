//! In-memory table registry with the fetch lifecycle
//!
//! The registry owns the console's view of the admin API's table
//! collection. One owner applies every mutation on one thread, so state
//! transitions need no locking and observe a strict order: commands
//! applied between a fetch dispatch and its settle are visible
//! immediately, then overwritten wholesale if the fetch succeeds.

use shared::Table;

use crate::{FetchError, HttpClient};

/// Table collection plus the flags of the in-flight fetch
///
/// `loading` is raised synchronously when a fetch is dispatched and
/// cleared when it settles. `error` holds the message of the most recent
/// failed fetch and is cleared on the next dispatch; a failed fetch never
/// touches the table collection itself.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: Vec<Table>,
    loading: bool,
    error: Option<String>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Current table sequence, in insertion / server order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failed fetch, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Append a table to the end of the sequence
    ///
    /// No uniqueness check on the id; the caller hands in non-colliding
    /// ids (locally created tables carry fresh UUIDs).
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Remove every table with the given id
    ///
    /// Removing an id the registry does not hold is a silent no-op.
    pub fn remove_table(&mut self, id: &str) {
        self.tables.retain(|t| t.id != id);
    }

    /// Replace the stored table that shares `table.id`, keeping its position
    ///
    /// The whole record is replaced; there is no field-level merge.
    /// Updating an id the registry does not hold is a silent no-op.
    pub fn update_table(&mut self, table: Table) {
        if let Some(slot) = self.tables.iter_mut().find(|t| t.id == table.id) {
            *slot = table;
        }
    }

    /// Mark a fetch as dispatched: raises `loading`, clears `error`
    ///
    /// Call this the moment the request is sent, before it resolves, so
    /// readers see the in-flight signal without waiting on the network.
    pub fn fetch_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Settle the in-flight fetch
    ///
    /// Success replaces the whole collection with the response, local
    /// edits made while the fetch was pending included. Failure records
    /// the error message and leaves the collection untouched. When
    /// several fetches overlap, outcomes apply in arrival order and the
    /// last one wins.
    pub fn fetch_settled(&mut self, outcome: Result<Vec<Table>, FetchError>) {
        match outcome {
            Ok(tables) => {
                tracing::debug!(count = tables.len(), "table fetch fulfilled");
                self.tables = tables;
                self.loading = false;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "table fetch rejected");
                self.error = Some(e.to_string());
                self.loading = false;
            }
        }
    }

    /// Dispatch a fetch against `client` and settle it in one call
    ///
    /// Event-loop callers that cannot hold `&mut self` across an await
    /// drive `fetch_started` / `fetch_settled` around their own spawned
    /// request instead.
    pub async fn refresh(&mut self, client: &HttpClient) {
        self.fetch_started();
        let outcome = client.fetch_tables().await;
        self.fetch_settled(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn table(id: &str, name: &str) -> Table {
        Table {
            id: id.to_string(),
            name: name.to_string(),
            is_occupied: false,
            qr_code: format!("qr-{id}"),
        }
    }

    #[test]
    fn test_add_remove_update_sequence() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("1", "T1"));
        registry.add_table(table("2", "T2"));
        registry.add_table(table("3", "T3"));

        registry.remove_table("2");

        let mut renamed = table("3", "Patio 3");
        renamed.is_occupied = true;
        registry.update_table(renamed.clone());

        let ids: Vec<&str> = registry.tables().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(registry.tables()[1], renamed);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("1", "T1"));
        registry.add_table(table("2", "T2"));
        registry.add_table(table("3", "T3"));

        registry.update_table(table("2", "Window 2"));

        assert_eq!(registry.tables()[1].name, "Window 2");
        assert_eq!(registry.tables().len(), 3);
    }

    #[test]
    fn test_update_absent_id_is_noop() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("1", "T1"));
        let before = registry.tables().to_vec();

        registry.update_table(table("99", "Ghost"));

        assert_eq!(registry.tables(), &before[..]);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("1", "T1"));

        registry.remove_table("99");

        assert_eq!(registry.tables().len(), 1);
    }

    #[test]
    fn test_remove_clears_duplicate_ids() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("1", "T1"));
        registry.add_table(table("1", "T1 again"));
        registry.add_table(table("2", "T2"));

        registry.remove_table("1");

        let ids: Vec<&str> = registry.tables().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn test_fetch_started_raises_loading_and_clears_error() {
        let mut registry = TableRegistry::new();
        registry.fetch_settled(Err(FetchError::Status(StatusCode::NOT_FOUND)));
        assert!(registry.error().is_some());

        registry.fetch_started();

        assert!(registry.is_loading());
        assert!(registry.error().is_none());
    }

    #[test]
    fn test_fetch_fulfilled_replaces_collection() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("local", "Local"));
        registry.fetch_started();

        registry.fetch_settled(Ok(vec![table("1", "T1"), table("2", "T2")]));

        let ids: Vec<&str> = registry.tables().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(!registry.is_loading());
        assert!(registry.error().is_none());
    }

    #[test]
    fn test_fetch_rejected_keeps_collection() {
        let mut registry = TableRegistry::new();
        registry.add_table(table("1", "T1"));
        let before = registry.tables().to_vec();
        registry.fetch_started();

        registry.fetch_settled(Err(FetchError::Status(StatusCode::NOT_FOUND)));

        assert!(!registry.is_loading());
        assert!(registry.error().is_some_and(|e| e.contains("404")));
        assert_eq!(registry.tables(), &before[..]);
    }

    #[test]
    fn test_edits_while_pending_are_overwritten_on_success() {
        let mut registry = TableRegistry::new();
        registry.fetch_started();
        registry.add_table(table("local", "Local"));

        registry.fetch_settled(Ok(vec![table("1", "T1")]));

        let ids: Vec<&str> = registry.tables().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }
}
