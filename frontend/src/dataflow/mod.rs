//! Dataflow primitives for reactive state
//!
//! - **[`Relay`]** - typed event channel from UI sources to state owners
//! - **[`Actor`]** - single reactive value mutated only by its processing task
//! - **[`ActorVec`]** - reactive collection mutated only by its processing task
//!
//! Relays follow the `{source}_{event}_relay` naming pattern.

pub mod actor;
pub mod actor_vec;
pub mod relay;

pub use actor::Actor;
pub use actor_vec::ActorVec;
pub use relay::{Relay, relay};
