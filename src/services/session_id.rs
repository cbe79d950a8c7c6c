// src/services/session_id.rs
use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

/// Storage key the correlation token lives under.
pub const SESSION_KEY: &str = "user_session_id";

/// Key/value storage that lives exactly as long as one browser tab.
pub trait TabStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryTabStorage {
    items: HashMap<String, String>,
}

impl MemoryTabStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStorage for MemoryTabStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_owned(), value);
    }
}

/// Return the tab's correlation token, creating it on first use.
///
/// The token is `s_<unix millis>_<0..99999>`. It only has to avoid accidental
/// collisions between tabs; it is not a credential.
pub fn ensure_session(storage: &mut impl TabStorage) -> String {
    if let Some(existing) = storage.get_item(SESSION_KEY) {
        return existing;
    }
    let id = generate_session_id();
    storage.set_item(SESSION_KEY, id.clone());
    id
}

pub fn current_session(storage: &impl TabStorage) -> Option<String> {
    storage.get_item(SESSION_KEY)
}

fn generate_session_id() -> String {
    // `s_<epoch millis>_<8 random hex digits>`
    let random = Uuid::new_v4().simple().to_string();
    format!("s_{}_{}", Utc::now().timestamp_millis(), &random[..8])
}
