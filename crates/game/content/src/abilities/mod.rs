//! Reusable ability behaviors.

mod barrier;
mod bolt;
mod channel;

pub use barrier::Barrier;
pub use bolt::Bolt;
pub use channel::Channel;
