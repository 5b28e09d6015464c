pub use serde_with;

pub mod itinerary;
pub mod movement;
pub mod session;
pub mod totals;
pub mod visit;
pub mod wire;

/// Shown wherever a visit has no resolved place name.
pub const UNKNOWN_LOCATION: &str = "Unknown";

pub trait ExampleData {
    fn example_data() -> Self;
}
