pub mod dinner_instance;
pub mod error;
pub mod event_sequence;
pub mod group;
pub mod location;
pub mod location_registry;
pub mod travel_time_matrix;
