//! Response middleware that needs application state.
//!
//! - [`error_detail::expose_error_detail`] -- Adds `detail` to 500 bodies in development mode.

pub mod error_detail;
