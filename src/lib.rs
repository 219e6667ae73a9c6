//! Travel Agent - Conversational Travel Booking Assistant
//!
//! This crate runs a booking conversation as a state machine: understand the
//! customer's request, recall their profile, search flights, hotels and
//! activities, present options, and on confirmation charge the card, confirm
//! with the supplier and email the customer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
