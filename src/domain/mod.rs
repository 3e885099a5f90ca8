//! Domain layer: the onboarding record, its validation rules and the ports
//! through which the application layer reaches the outside world.

pub mod application;
pub mod directory;
pub mod ports;
pub mod review;
pub mod step;
pub mod transaction;
pub mod validation;
