//! Core types and math for LSD basket rebalancing.
//!
//! Everything in this crate is pure: fixed-point conversion, decentralization
//! weight factors, NAV and target units. I/O lives in the collaborator crates.

pub mod entities;
pub mod enums;
pub mod error;
pub mod math;
pub mod metrics;
pub mod value_objects;

pub use enums::PoolId;
pub use error::{RebalanceError, Result};
pub use math::FixedPoint;
pub use value_objects::{ByPool, Percentage};
