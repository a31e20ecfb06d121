//! Scam Honeypot - Conversational scam engagement engine
//!
//! Engages suspected scammers in multi-turn conversation, scores each message
//! for fraud intent, extracts identifying intelligence (phone numbers, payment
//! handles, bank identifiers, links), and reports a summary to an external
//! collector once the engagement completes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
