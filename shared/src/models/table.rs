//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity as the admin API serves it
///
/// Wire field names are fixed by the API contract: `id`, `name`,
/// `is_occupied`, `qr_code`. Updates replace the whole record; there is no
/// partial-field merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub is_occupied: bool,
    pub qr_code: String,
}

impl Table {
    /// Table created locally in the console, not yet known to the admin API.
    /// Gets a fresh UUID id, starts free, with an empty QR code.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            is_occupied: false,
            qr_code: String::new(),
        }
    }
}
