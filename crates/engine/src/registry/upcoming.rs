//! Calendar look-ahead: upcoming events and advance notifications.

use tails_domain::{CalendarTime, EventNotification, UpcomingEvent};

use super::EventRegistry;

impl EventRegistry {
    /// Active scheduled events firing within `0..=days_ahead` days of `now`.
    ///
    /// Ordered by days until the event, then registration order.
    pub fn upcoming(&self, now: CalendarTime, days_ahead: u32) -> Vec<UpcomingEvent> {
        let mut upcoming: Vec<UpcomingEvent> = self
            .all_events()
            .into_iter()
            .filter(|event| event.is_active())
            .filter_map(|event| {
                let days_until = event.schedule()?.next_occurrence(now, days_ahead)?;
                Some(UpcomingEvent { event, days_until })
            })
            .collect();
        upcoming.sort_by_key(|u| u.days_until);
        upcoming
    }

    /// Notifications for active scheduled events with a notification lead.
    ///
    /// An event is announced when its next occurrence is within its own lead
    /// window, including the day it fires (`days_until == 0`).
    pub fn notifications(&self, now: CalendarTime) -> Vec<EventNotification> {
        self.all_events()
            .into_iter()
            .filter(|event| event.is_active() && event.notification_lead_days() > 0)
            .filter_map(|event| {
                let lead = event.notification_lead_days();
                let days_until = event.schedule()?.next_occurrence(now, lead)?;
                Some(EventNotification::for_event(&event, days_until))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::{event, id};
    use tails_domain::{EventDefinition, EventPriority, Schedule, Season};

    fn at(season: Season, day: u8) -> CalendarTime {
        CalendarTime::new(1, season, day).unwrap()
    }

    fn harvest_festival() -> EventDefinition {
        EventDefinition::seasonal(id("harvest_festival"), "Harvest Festival", Season::Autumn, 15)
            .with_notification_lead_days(3)
    }

    mod notifications {
        use super::*;

        #[test]
        fn harvest_festival_three_days_out() {
            let registry = EventRegistry::new();
            registry.register(harvest_festival()).unwrap();

            let notes = registry.notifications(at(Season::Autumn, 12));
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].event_id.as_str(), "harvest_festival");
            assert_eq!(notes[0].days_until, 3);
            assert_eq!(notes[0].message, "Harvest Festival in 3 days");
        }

        #[test]
        fn outside_lead_window_is_silent() {
            let registry = EventRegistry::new();
            registry.register(harvest_festival()).unwrap();
            assert!(registry.notifications(at(Season::Autumn, 11)).is_empty());
            assert!(registry.notifications(at(Season::Autumn, 16)).is_empty());
        }

        #[test]
        fn day_of_event_is_announced() {
            let registry = EventRegistry::new();
            registry.register(harvest_festival()).unwrap();
            let notes = registry.notifications(at(Season::Autumn, 15));
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].days_until, 0);
        }

        #[test]
        fn skips_events_without_lead_or_inactive() {
            let registry = EventRegistry::new();
            registry
                .register(EventDefinition::seasonal(
                    id("quiet_fair"),
                    "Quiet Fair",
                    Season::Autumn,
                    13,
                ))
                .unwrap();
            registry.register(harvest_festival().inactive()).unwrap();
            assert!(registry.notifications(at(Season::Autumn, 12)).is_empty());
        }

        #[test]
        fn uses_description_when_present() {
            let registry = EventRegistry::new();
            registry
                .register(harvest_festival().with_description("Stock up on pumpkins!"))
                .unwrap();
            let notes = registry.notifications(at(Season::Autumn, 14));
            assert_eq!(notes[0].message, "Stock up on pumpkins!");
            assert_eq!(notes[0].days_until, 1);
        }
    }

    mod upcoming {
        use super::*;

        #[test]
        fn ordered_by_days_until_then_registration() {
            let registry = EventRegistry::new();
            registry
                .register(
                    event("payday", EventPriority::High)
                        .with_schedule(Schedule::Monthly { day_of_month: 2 }),
                )
                .unwrap();
            registry.register(harvest_festival()).unwrap();
            registry
                .register(
                    event("market_day", EventPriority::Low)
                        .with_schedule(Schedule::Monthly { day_of_month: 15 }),
                )
                .unwrap();
            registry.register(event("unscheduled", EventPriority::Urgent)).unwrap();

            let upcoming = registry.upcoming(at(Season::Autumn, 12), 30);
            let listed: Vec<(&str, u32)> = upcoming
                .iter()
                .map(|u| (u.event.id().as_str(), u.days_until))
                .collect();
            assert_eq!(
                listed,
                vec![("harvest_festival", 3), ("market_day", 3), ("payday", 20)]
            );
        }

        #[test]
        fn crosses_year_boundary() {
            let registry = EventRegistry::new();
            registry
                .register(EventDefinition::seasonal(
                    id("new_year"),
                    "New Year",
                    Season::Spring,
                    1,
                ))
                .unwrap();
            let upcoming = registry.upcoming(at(Season::Winter, 29), 5);
            assert_eq!(upcoming.len(), 1);
            assert_eq!(upcoming[0].days_until, 2);
        }

        #[test]
        fn window_is_inclusive() {
            let registry = EventRegistry::new();
            registry.register(harvest_festival()).unwrap();
            assert_eq!(registry.upcoming(at(Season::Autumn, 12), 3).len(), 1);
            assert!(registry.upcoming(at(Season::Autumn, 12), 2).is_empty());
        }
    }
}
