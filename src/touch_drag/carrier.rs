use std::any::Any;

use itertools::Itertools as _;

/// The only effect a touch drag ever advertises.
pub const EFFECT_ALLOWED: &str = "move";

/// Payload attached to every drag-family event of one touch session.
///
/// Listeners stash data in `dragstart` and read it back in `drop`, exactly like a native
/// `DataTransfer`. Values are typed: [`Self::get`] returns `None` both for a missing key and for
/// a key holding a value of another type.
///
/// A fresh carrier is created whenever the tracker resets, so nothing leaks between sessions.
#[derive(Default)]
pub struct DataTransfer {
    store: ahash::HashMap<String, Box<dyn Any>>,
}

impl DataTransfer {
    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.store.insert(key.into(), Box::new(value));
    }

    /// The most recently stored value for `key`, if it has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.store.get(key)?.downcast_ref::<T>()
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.store.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Stored keys, sorted.
    pub fn types(&self) -> Vec<&str> {
        self.store.keys().map(String::as_str).sorted().collect()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn effect_allowed(&self) -> &'static str {
        EFFECT_ALLOWED
    }
}

impl std::fmt::Debug for DataTransfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTransfer")
            .field("types", &self.types())
            .field("effect_allowed", &EFFECT_ALLOWED)
            .finish()
    }
}
