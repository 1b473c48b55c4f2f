//! Application layer: orchestration of the token life cycle.
//!
//! This crate owns the error taxonomy, the inbound/outbound ports and the
//! [`tokens::RefreshTokenService`] state machine. It knows nothing about
//! axum, sqlx or jsonwebtoken; adapters plug in behind the ports.

pub mod dto;
pub mod error;
pub mod ports;
pub mod tokens;
pub mod usecases;
