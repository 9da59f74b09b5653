//! Dispatcher - fires events, applies their effects and chains follow-ups.

use std::cmp::Reverse;
use std::sync::Arc;

use tails_domain::{
    CalendarTime, DomainError, EventContext, EventDefinition, EventTriggerResult,
};

use super::EventRegistry;

/// Deepest follow-up chain fired from one trigger; the root event is depth 0
pub const MAX_FOLLOW_UP_DEPTH: usize = 16;

impl EventRegistry {
    /// Fire every active scheduled event due on `now` whose conditions pass.
    ///
    /// Events fire in descending priority, ties in registration order. Each
    /// event's follow-ups complete before the next event starts.
    pub fn update(&self, ctx: &EventContext, now: CalendarTime) -> Vec<EventTriggerResult> {
        let mut due: Vec<Arc<EventDefinition>> = self
            .all_events()
            .into_iter()
            .filter(|event| event.is_active())
            .filter(|event| event.schedule().is_some_and(|s| s.should_trigger(now)))
            .filter(|event| event.check_conditions(ctx))
            .collect();

        // stable: equal priorities keep registration order
        due.sort_by_key(|event| Reverse(event.priority()));

        if !due.is_empty() {
            tracing::info!(date = %now, due = due.len(), "Dispatching scheduled events");
        }

        due.into_iter()
            .map(|event| self.fire(event, ctx, 0))
            .collect()
    }

    /// Fire `id` now, bypassing its schedule and conditions.
    ///
    /// An unknown id yields a failed result carrying `NotFound`.
    pub fn trigger(&self, id: &str, ctx: &EventContext) -> EventTriggerResult {
        match self.get(id) {
            Some(event) => self.fire(event, ctx, 0),
            None => {
                tracing::warn!(event_id = %id, "Trigger requested for unknown event");
                EventTriggerResult::not_found(id)
            }
        }
    }

    pub(crate) fn fire(
        &self,
        event: Arc<EventDefinition>,
        ctx: &EventContext,
        depth: usize,
    ) -> EventTriggerResult {
        // all effects run even after one fails
        let effects = event.effects().iter().map(|e| e.apply(ctx)).collect();
        let mut result = EventTriggerResult::from_effects(event.clone(), effects);

        if result.success {
            tracing::info!(
                event_id = %event.id(),
                total_effects = result.effects.len(),
                depth,
                "Triggered event"
            );
        } else {
            let failed: Vec<&str> = event
                .effects()
                .iter()
                .zip(&result.effects)
                .filter(|(_, outcome)| !outcome.success)
                .map(|(effect, _)| effect.kind())
                .collect();
            tracing::warn!(
                event_id = %event.id(),
                failed_effects = ?failed,
                error = ?result.error,
                "Event triggered with failed effects"
            );
        }

        for subscriber in self.subscriber_snapshot() {
            subscriber(&event);
        }

        for follow_up_id in event.follow_up_ids() {
            let follow_up = self.fire_follow_up(follow_up_id.as_str(), ctx, depth + 1);
            if !follow_up.success {
                tracing::warn!(
                    event_id = %event.id(),
                    follow_up = %follow_up_id,
                    error = ?follow_up.error,
                    "Follow-up event failed"
                );
            }
            result.follow_ups.push(follow_up);
        }

        result
    }

    fn fire_follow_up(&self, id: &str, ctx: &EventContext, depth: usize) -> EventTriggerResult {
        if depth > MAX_FOLLOW_UP_DEPTH {
            return EventTriggerResult::rejected(
                id,
                DomainError::follow_up_depth_exceeded(id, depth),
            );
        }
        match self.get(id) {
            Some(event) => self.fire(event, ctx, depth),
            None => EventTriggerResult::not_found(id),
        }
    }
}
