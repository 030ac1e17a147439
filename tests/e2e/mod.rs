//! End-to-end tests for litebatch
//!
//! These tests call the real Groq API and require GROQ_API_KEY.
//! Run with: GROQ_API_KEY=xxx cargo test -- --ignored

pub mod groq;
