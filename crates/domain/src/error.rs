//! Unified error types for the event domain
//!
//! Trigger failures are carried inside `EventTriggerResult::error` rather than
//! returned as `Err`, so every variant is `Clone` and comparable in tests.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An entity with the same id is already registered
    #[error("Duplicate {entity_type} id: {id}")]
    Duplicate {
        entity_type: &'static str,
        id: String,
    },

    /// One or more effects of a triggered event reported failure
    #[error("Effect application failed for event {event_id}: {failed} effect(s) failed")]
    EffectFailed { event_id: String, failed: usize },

    /// Follow-up chaining went deeper than the configured bound
    #[error("Follow-up chain too deep at event {event_id} (depth {depth})")]
    FollowUpDepthExceeded { event_id: String, depth: usize },

    /// The follow-up graph contains a cycle
    #[error("Follow-up cycle detected: {}", path.join(" -> "))]
    FollowUpCycle { path: Vec<String> },

    /// A follow-up references an event that is not registered
    #[error("Event {event_id} references unknown follow-up {follow_up}")]
    UnknownFollowUp { event_id: String, follow_up: String },
}

impl DomainError {
    /// Creates a validation error for constructor and builder preconditions.
    ///
    /// # Example
    /// ```ignore
    /// if day == 0 {
    ///     return Err(DomainError::validation("Day must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a duplicate id error
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Create an effect failure error
    pub fn effect_failed(event_id: impl Into<String>, failed: usize) -> Self {
        Self::EffectFailed {
            event_id: event_id.into(),
            failed,
        }
    }

    /// Create a follow-up depth error
    pub fn follow_up_depth_exceeded(event_id: impl Into<String>, depth: usize) -> Self {
        Self::FollowUpDepthExceeded {
            event_id: event_id.into(),
            depth,
        }
    }

    /// Returns true for the "event not found" case surfaced by manual triggers.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
