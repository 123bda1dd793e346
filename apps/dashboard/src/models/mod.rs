pub mod application;
pub mod ranking;
