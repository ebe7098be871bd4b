//! Framework-free 3DS types and the return-page decision table.

pub mod authorization;
pub mod decision;
pub mod order;
pub mod ports;
pub mod token;
