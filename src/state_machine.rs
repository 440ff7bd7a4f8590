//! Conversation store state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the session feeds an [`Event`] into [`transition`], stores the new state
//! and executes the returned [`Effect`]s.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ExchangeStatus, SessionState};
pub use transition::{transition, TransitionError};
