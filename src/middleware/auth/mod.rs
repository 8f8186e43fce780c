pub mod bearer;

pub use bearer::{AuthFailure, BearerScheme, apply, authenticate};
