//! Merchant Core - Subscription Lifecycle Engine
//!
//! This crate implements the state machine, renewal workflow, grace-period
//! policy, and listener notifications behind recurring subscriptions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
