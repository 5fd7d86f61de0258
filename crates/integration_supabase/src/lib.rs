//! Supabase Auth integration
//!
//! A thin client for the GoTrue REST API behind `<project>/auth/v1`:
//! sign-up, password and refresh-token grants, recovery email, password
//! update, logout, user lookup and OAuth authorize URLs. Every request
//! carries the project's anon key in the `apikey` header.
//!
//! Provider error bodies are reduced to a single message
//! (`error_description`, `msg`, `message` or `error`, whichever is present)
//! in [`SupabaseError::Api`].

mod client;
mod config;
mod error;
mod models;

pub use client::{AuthClient, SupabaseAuthClient};
pub use config::SupabaseConfig;
pub use error::SupabaseError;
pub use models::{Session, SignUpResponse, User};
