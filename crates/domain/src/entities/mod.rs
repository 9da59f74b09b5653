//! Domain entities - the building blocks of event definitions

mod condition;
mod context;
mod effect;
mod schedule;
mod trigger_result;

pub use condition::{check_all, Condition};
pub use context::{ContextKey, ContextValue, EventContext, MerchantRank};
pub use effect::{Effect, EffectResult, ItemStack, Weather, PAYDAY_CITIZENS};
pub use schedule::Schedule;
pub use trigger_result::{EventNotification, EventTriggerResult, UpcomingEvent};
