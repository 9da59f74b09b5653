//! Dispatch outputs: trigger results, notifications and upcoming events

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregates::{EventDefinition, Rewards};
use crate::entities::effect::EffectResult;
use crate::error::DomainError;
use crate::ids::EventId;

/// Outcome of firing one event, including the follow-ups it chained into.
///
/// `success` reflects this event's own effects only. A failing follow-up is
/// visible in `follow_ups` but never flips the parent to failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTriggerResult {
    pub success: bool,
    /// Id that was requested, present even when the event was not found
    pub event_id: String,
    pub event: Option<Arc<EventDefinition>>,
    pub effects: Vec<EffectResult>,
    pub rewards: Option<Rewards>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<DomainError>,
    pub follow_ups: Vec<EventTriggerResult>,
}

fn serialize_error<S>(error: &Option<DomainError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl EventTriggerResult {
    /// A result for an id with no registered event.
    pub fn not_found(event_id: impl Into<String>) -> Self {
        let event_id = event_id.into();
        Self {
            success: false,
            error: Some(DomainError::not_found("Event", event_id.clone())),
            event_id,
            event: None,
            effects: Vec::new(),
            rewards: None,
            follow_ups: Vec::new(),
        }
    }

    /// A result for an event that was not fired because of `error`.
    pub fn rejected(event_id: impl Into<String>, error: DomainError) -> Self {
        Self {
            success: false,
            event_id: event_id.into(),
            event: None,
            effects: Vec::new(),
            rewards: None,
            error: Some(error),
            follow_ups: Vec::new(),
        }
    }

    /// Build the result of applying `effects` for `event`.
    ///
    /// Success is the AND of every effect's success; any failure records an
    /// `EffectFailed` error naming how many effects failed.
    pub fn from_effects(event: Arc<EventDefinition>, effects: Vec<EffectResult>) -> Self {
        let failed = effects.iter().filter(|e| !e.success).count();
        let event_id = event.id().to_string();
        let error = (failed > 0).then(|| DomainError::effect_failed(event_id.clone(), failed));
        Self {
            success: failed == 0,
            rewards: event.rewards().cloned(),
            event_id,
            event: Some(event),
            effects,
            error,
            follow_ups: Vec::new(),
        }
    }

    /// Ids of this event and every follow-up that actually fired, depth-first
    /// in firing order.
    pub fn triggered_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<String>) {
        if self.event.is_some() {
            ids.push(self.event_id.clone());
        }
        for follow_up in &self.follow_ups {
            follow_up.collect_ids(ids);
        }
    }
}

/// Advance notice of a scheduled event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotification {
    pub event_id: EventId,
    pub event_name: String,
    /// Days until the event fires; 0 means today
    pub days_until: u32,
    pub message: String,
}

impl EventNotification {
    /// Notification for `event`, using its description as the message when set.
    pub fn for_event(event: &EventDefinition, days_until: u32) -> Self {
        let message = if event.description().is_empty() {
            match days_until {
                0 => format!("{} is today", event.name()),
                1 => format!("{} in 1 day", event.name()),
                n => format!("{} in {} days", event.name(), n),
            }
        } else {
            event.description().to_string()
        };
        Self {
            event_id: event.id().clone(),
            event_name: event.name().to_string(),
            days_until,
            message,
        }
    }
}

/// A scheduled event that will fire within a look-ahead window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub event: Arc<EventDefinition>,
    pub days_until: u32,
}
