//! Game session orchestration for neontris.
//!
//! A [`GameSession`] ties the board simulation, the move advisor and the difficulty
//! controller together. It is driven by two inputs: elapsed time
//! ([`GameSession::tick`]) and player [`Intent`]s ([`GameSession::apply`]). Whatever
//! happened in between is buffered as [`GameEvent`]s for collaborators such as audio.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use neontris_game::{GameEvent, GameSession, Intent, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::default()).unwrap();
//! session.apply(Intent::HardDrop);
//! session.tick(Duration::from_millis(16));
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! assert_eq!(session.drain_events().next(), Some(GameEvent::PieceDropped));
//! ```

pub use self::{config::*, event::*, intent::*, session::*};

mod config;
mod event;
mod intent;
mod session;
