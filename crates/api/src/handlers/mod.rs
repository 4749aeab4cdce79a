pub mod attendance;
pub mod results;
