pub mod classify;
pub mod convert;
pub mod distance;
pub mod gateway;
pub mod journey;
