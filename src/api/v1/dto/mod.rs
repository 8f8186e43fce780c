pub mod me;
pub mod topics;
