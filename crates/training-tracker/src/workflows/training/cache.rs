use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tracing::{debug, info};

use super::domain::Roster;
use crate::workflows::roster::RosterImportError;

/// Anything that can produce a fresh roster on demand.
pub trait RosterSource: Send + Sync {
    fn load(&self) -> Result<Roster, RosterImportError>;
    fn describe(&self) -> String;
}

/// Read-through cache holding at most one parsed roster.
///
/// Callers that need fresh data call [`RosterCache::invalidate`] and then
/// [`RosterCache::get`]; nothing expires on its own.
pub struct RosterCache<S> {
    source: S,
    slot: Mutex<Option<Arc<Roster>>>,
}

impl<S: RosterSource> RosterCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
        }
    }

    pub fn get(&self) -> Result<Arc<Roster>, RosterImportError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(roster) = slot.as_ref() {
            debug!(source = %self.source.describe(), "roster cache hit");
            return Ok(Arc::clone(roster));
        }

        let started = Instant::now();
        let roster = Arc::new(self.source.load()?);
        info!(
            source = %self.source.describe(),
            records = roster.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "roster loaded"
        );
        *slot = Some(Arc::clone(&roster));
        Ok(roster)
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            info!(source = %self.source.describe(), "roster cache invalidated");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
    }

    impl RosterSource for CountingSource {
        fn load(&self) -> Result<Roster, RosterImportError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Roster::default())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    struct MissingSource;

    impl RosterSource for MissingSource {
        fn load(&self) -> Result<Roster, RosterImportError> {
            Err(RosterImportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "gone",
            )))
        }

        fn describe(&self) -> String {
            "missing".to_string()
        }
    }

    #[test]
    fn loads_once_until_invalidated() {
        let cache = RosterCache::new(CountingSource::default());
        assert!(!cache.is_loaded());

        cache.get().expect("first load");
        cache.get().expect("cached load");
        assert_eq!(cache.source().loads.load(Ordering::SeqCst), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        cache.get().expect("reload");
        assert_eq!(cache.source().loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let cache = RosterCache::new(MissingSource);
        assert!(cache.get().is_err());
        assert!(!cache.is_loaded());
    }
}
