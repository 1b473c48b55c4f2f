//! Adapter implementations behind the application ports.

pub mod outbound;
