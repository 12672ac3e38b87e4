//! Domain models for the wound-orders system.

mod catalog;
mod ivr;
mod order;
mod patient;
mod provider;

pub use catalog::*;
pub use ivr::*;
pub use order::*;
pub use patient::*;
pub use provider::*;
