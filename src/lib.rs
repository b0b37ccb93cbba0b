//! Facility Concierge - Conversational facility booking
//!
//! This crate runs multi-turn conversations that collect and validate a
//! facility booking (employee id, facility type, floor, date) and answer
//! navigation questions, driven by intent classification and a stack of
//! waterfall dialogs persisted per conversation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
