use minigame_engine::{Clock, MemoryStorage, SessionStorage, StorageError};

/// `window.sessionStorage` behind the engine's storage trait.
pub struct WebSessionStorage {
    storage: web_sys::Storage,
}

impl WebSessionStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = window
            .session_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("sessionStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl SessionStorage for WebSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| StorageError::WriteRejected {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

/// Browser session storage, or an in-memory map when the page has none
/// (private mode, sandboxed iframes).
pub fn open_session_storage() -> Box<dyn SessionStorage> {
    match WebSessionStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{}; results will not survive a reload", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Wall clock backed by `Date.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Seed for session tokens.
pub fn entropy_seed() -> u64 {
    let random = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let now = js_sys::Date::now() as u64;
    (random << 32) ^ now
}
