//! Core matching logic. Keep this crate free of IO and platform concerns.

pub mod archetype;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod deck;
pub mod events;
pub mod gesture;
pub mod profile;
pub mod rng;
pub mod session;
pub mod state;
pub mod survey;
pub mod synth;

pub use archetype::*;
pub use cards::*;
pub use catalog::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use gesture::*;
pub use profile::*;
pub use rng::*;
pub use session::*;
pub use state::*;
pub use survey::*;
pub use synth::*;
