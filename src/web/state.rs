use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::DashboardError;
use crate::io::{read_csv_from_bytes, TableCache};
use crate::models::Table;

/// Shared server state: the page builder and the parsed-upload cache.
pub struct AppState {
    pub dashboard: Dashboard,
    cache: Mutex<TableCache>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = TableCache::new(config.cache_capacity);
        Self {
            dashboard: Dashboard::new(config),
            cache: Mutex::new(cache),
        }
    }

    fn cache(&self) -> MutexGuard<'_, TableCache> {
        self.cache.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Parse an upload, reusing the cached table for identical content.
    ///
    /// The lock is released while parsing; failed parses are not cached.
    pub fn load(&self, data: &[u8], name: &str) -> Result<Arc<Table>, DashboardError> {
        let key = TableCache::content_key(data, name);
        if let Some(table) = self.cache().get(&key) {
            return Ok(table);
        }

        tracing::debug!(key = %key, "table cache miss");
        let table = Arc::new(read_csv_from_bytes(data, name)?);
        Ok(self.cache().insert(key, table))
    }

    pub fn cached_tables(&self) -> usize {
        self.cache().len()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.dashboard.config().server.max_upload_bytes
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reuses_cached_table() {
        let state = AppState::default();
        let data = b"Traffic\nLow\nHigh\n";
        let first = state.load(data, "orders").unwrap();
        let second = state.load(data, "orders").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.cached_tables(), 1);
    }

    #[test]
    fn test_failed_load_not_cached() {
        let state = AppState::default();
        assert!(state.load(b"", "empty").is_err());
        assert_eq!(state.cached_tables(), 0);
    }

    #[test]
    fn test_concurrent_loads_share_one_table() {
        let state = Arc::new(AppState::default());
        let data: &'static [u8] = b"Traffic,Delivery_Time\nLow,10\nHigh,20\n";

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || state.load(data, "orders").unwrap())
            })
            .collect();
        let tables: Vec<Arc<Table>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let cached = state.load(data, "orders").unwrap();
        assert!(tables.iter().all(|t| Arc::ptr_eq(t, &cached)));
        assert_eq!(state.cached_tables(), 1);
    }

    #[test]
    fn test_cache_usable_after_failed_load() {
        let state = AppState::default();
        assert!(state.load(b"a,b\n\"open,1\n", "broken").is_err());
        let table = state.load(b"a\n1\n", "ok").unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(state.cached_tables(), 1);
    }

    #[test]
    fn test_capacity_from_config() {
        let config = DashboardConfig {
            cache_capacity: 2,
            ..DashboardConfig::default()
        };
        let state = AppState::new(config);
        state.load(b"a\n1\n", "one").unwrap();
        state.load(b"a\n2\n", "two").unwrap();
        state.load(b"a\n3\n", "three").unwrap();
        assert_eq!(state.cached_tables(), 2);
    }
}
