#![forbid(unsafe_code)]

pub mod aggregate;
pub mod climbs;
pub mod frames;
pub mod grid;
pub mod holds;
pub mod roles;
