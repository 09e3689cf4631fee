//! Fire physics: surface spread rate and firebreak effectiveness

pub mod firebreak_effect;
pub mod rothermel;

pub use firebreak_effect::{adjust_ros, adjust_ros_continuous, FirebreakMode};
pub use rothermel::{rate_of_spread, rate_of_spread_with, RosVariant, SpreadRate, SpreadStatus};
