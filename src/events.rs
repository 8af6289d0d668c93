pub mod details;
pub mod ics;
pub mod model;
