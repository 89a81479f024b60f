pub mod options;
pub mod session;
pub mod sources;
pub mod start_point;
pub mod surface;
