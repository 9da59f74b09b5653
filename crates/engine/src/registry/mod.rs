//! Event registry - the catalog of event definitions.
//!
//! The registry owns every registered `EventDefinition` and the list of
//! subscribers notified when events fire. Dispatch lives in `dispatch`,
//! calendar look-ahead queries in `upcoming`.
//!
//! # Locking
//!
//! The catalog and subscriber list each sit behind one `RwLock`. Readers copy
//! out `Arc` handles and release the lock before doing any work, so effects and
//! subscriber callbacks always run with no lock held and may call back into
//! the registry.

mod dispatch;
mod upcoming;

pub use dispatch::MAX_FOLLOW_UP_DEPTH;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tails_domain::{DomainError, EventDefinition, EventId, Season};

/// Callback invoked with each event as it fires
pub type Subscriber = Arc<dyn Fn(&EventDefinition) + Send + Sync>;

struct Registered {
    definition: Arc<EventDefinition>,
    seq: u64,
}

#[derive(Default)]
struct Catalog {
    events: HashMap<EventId, Registered>,
    next_seq: u64,
}

impl Catalog {
    /// Definitions in registration order.
    fn ordered(&self) -> Vec<Arc<EventDefinition>> {
        let mut entries: Vec<&Registered> = self.events.values().collect();
        entries.sort_by_key(|r| r.seq);
        entries.into_iter().map(|r| r.definition.clone()).collect()
    }
}

/// Thread-safe catalog of event definitions.
#[derive(Default)]
pub struct EventRegistry {
    catalog: RwLock<Catalog>,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(|p| p.into_inner())
    }

    fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(|p| p.into_inner())
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a definition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Duplicate` if an event with the same id exists;
    /// the registered definition is left untouched.
    pub fn register(&self, definition: EventDefinition) -> Result<(), DomainError> {
        let mut catalog = self.catalog_mut();
        let id = definition.id().clone();

        if catalog.events.contains_key(&id) {
            tracing::warn!(event_id = %id, "Rejected duplicate event registration");
            return Err(DomainError::duplicate("Event", id.as_str()));
        }

        let seq = catalog.next_seq;
        catalog.next_seq += 1;
        tracing::debug!(
            event_id = %id,
            priority = ?definition.priority(),
            category = ?definition.category(),
            "Registered event"
        );
        catalog.events.insert(
            id,
            Registered {
                definition: Arc::new(definition),
                seq,
            },
        );
        Ok(())
    }

    /// Register several definitions, stopping at the first error.
    pub fn register_all(
        &self,
        definitions: impl IntoIterator<Item = EventDefinition>,
    ) -> Result<(), DomainError> {
        definitions
            .into_iter()
            .try_for_each(|definition| self.register(definition))
    }

    /// Register a subscriber notified with every event that fires.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&EventDefinition) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .push(Arc::new(callback));
    }

    pub(crate) fn subscriber_snapshot(&self) -> Vec<Subscriber> {
        self.subscribers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Enable or disable an event.
    ///
    /// Handles already returned by `get` keep the state they were read with.
    pub fn set_active(&self, id: &str, active: bool) -> Result<(), DomainError> {
        let mut catalog = self.catalog_mut();
        let registered = catalog
            .events
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Event", id))?;
        Arc::make_mut(&mut registered.definition).set_active(active);
        tracing::debug!(event_id = %id, active, "Changed event activation");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: &str) -> Option<Arc<EventDefinition>> {
        self.catalog().events.get(id).map(|r| r.definition.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.catalog().events.contains_key(id)
    }

    /// Every registered event, in registration order.
    pub fn all_events(&self) -> Vec<Arc<EventDefinition>> {
        self.catalog().ordered()
    }

    /// Events with a seasonal schedule in `season`, in registration order.
    pub fn events_for_season(&self, season: Season) -> Vec<Arc<EventDefinition>> {
        self.all_events()
            .into_iter()
            .filter(|e| e.schedule().and_then(|s| s.season()) == Some(season))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.catalog().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog().events.is_empty()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the follow-up graph after content has loaded.
    ///
    /// # Errors
    ///
    /// - `UnknownFollowUp` for a follow-up id that is not registered
    /// - `FollowUpCycle` with the offending path if the graph has a cycle
    pub fn validate_follow_ups(&self) -> Result<(), DomainError> {
        let events = self.all_events();
        let by_id: HashMap<&str, &EventDefinition> =
            events.iter().map(|e| (e.id().as_str(), e.as_ref())).collect();

        for event in &events {
            if let Some(missing) = event
                .follow_up_ids()
                .iter()
                .find(|f| !by_id.contains_key(f.as_str()))
            {
                return Err(DomainError::UnknownFollowUp {
                    event_id: event.id().to_string(),
                    follow_up: missing.to_string(),
                });
            }
        }

        let mut done: HashSet<&str> = HashSet::new();
        for event in &events {
            let mut path = Vec::new();
            find_cycle(event.id().as_str(), &by_id, &mut path, &mut done)?;
        }
        Ok(())
    }
}

/// Depth-first search that reports the first cycle reachable from `id`.
fn find_cycle<'a>(
    id: &'a str,
    by_id: &HashMap<&'a str, &'a EventDefinition>,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Result<(), DomainError> {
    if done.contains(id) {
        return Ok(());
    }
    if let Some(start) = path.iter().position(|p| *p == id) {
        let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
        cycle.push(id.to_string());
        return Err(DomainError::FollowUpCycle { path: cycle });
    }

    path.push(id);
    if let Some(&event) = by_id.get(id) {
        for follow_up in event.follow_up_ids() {
            find_cycle(follow_up.as_str(), by_id, path, done)?;
        }
    }
    path.pop();
    done.insert(id);
    Ok(())
}
