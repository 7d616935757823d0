//! Core types for the flight-booking agent
//!
//! This crate provides the foundational types shared by the other crates:
//! - Conversation turns
//! - Recognition results returned by an NLU service, with null-safe
//!   entity access
//! - The booking slot record filled in from a recognition result

pub mod booking;
pub mod conversation;
pub mod recognition;

pub use booking::BookingDetails;
pub use conversation::{Turn, TurnRole};
pub use recognition::{IntentScore, RecognizerResult, INSTANCE_METADATA_KEY};
