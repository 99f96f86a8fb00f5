//! Mailer - Double opt-in newsletter subscriptions
//!
//! This crate implements a CAPTCHA-gated subscription API on top of the Loops
//! contact directory, with signed "magic link" tokens for a self-service
//! subscription control panel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
