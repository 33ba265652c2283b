pub mod location;
pub mod preferences;
pub mod session;
