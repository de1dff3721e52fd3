//! Notifications module
//!
//! Broadcasts ledger events to in-process subscribers (audit trails,
//! settlement workers).
//!
//! # Usage
//! ```ignore
//! use station_ledger::notifications::create_event_bus;
//!
//! let event_bus = create_event_bus();
//! let mut subscriber = event_bus.subscribe();
//! // ... run ledger operations through a LedgerService sharing `event_bus`
//! while let Some(message) = subscriber.try_recv() {
//!     println!("{} {}", message.sequence, message.event.event_type());
//! }
//! ```

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
