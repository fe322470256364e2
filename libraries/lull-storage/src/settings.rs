//! Scalar settings

use crate::backend::KeyValueStore;
use crate::error::Result;
use tracing::warn;

/// Absolute target of the last scheduled auto-stop, in clock milliseconds
pub const LAST_SCHEDULED_STOP_TIME: &str = "last_scheduled_stop_time";

/// Read the last scheduled stop time
///
/// Returns `None` if nothing was scheduled or the stored value is unreadable.
pub fn scheduled_stop_time(store: &dyn KeyValueStore) -> Option<i64> {
    match store.get(LAST_SCHEDULED_STOP_TIME) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(at) => Some(at),
            Err(e) => {
                warn!("Ignoring unreadable scheduled stop time {:?}: {}", raw, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read scheduled stop time: {}", e);
            None
        }
    }
}

/// Persist the scheduled stop time
pub fn set_scheduled_stop_time(store: &dyn KeyValueStore, at_millis: i64) -> Result<()> {
    store.set(LAST_SCHEDULED_STOP_TIME, at_millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;

    #[test]
    fn roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(scheduled_stop_time(&store), None);

        set_scheduled_stop_time(&store, 1_700_000_000_123).unwrap();
        assert_eq!(scheduled_stop_time(&store), Some(1_700_000_000_123));

        set_scheduled_stop_time(&store, -5).unwrap();
        assert_eq!(scheduled_stop_time(&store), Some(-5));
    }

    #[test]
    fn garbage_is_ignored() {
        let store = MemoryStore::new();
        store
            .set(LAST_SCHEDULED_STOP_TIME, "soon".to_string())
            .unwrap();
        assert_eq!(scheduled_stop_time(&store), None);
    }
}
