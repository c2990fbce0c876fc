//! Collaborators around a swipe session: text generation, spreadsheet sync
//! and survey export. Failures here never stop a session.

pub mod config;
pub mod export;
pub mod generator;
pub mod sync;

pub use config::*;
pub use export::*;
pub use generator::*;
pub use sync::*;
