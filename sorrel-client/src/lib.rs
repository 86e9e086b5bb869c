//! Sorrel Client - HTTP client for the CRM public API
//!
//! Provides network-based HTTP calls to the CRM endpoints the
//! storefront depends on: menu, order submission, event tracking,
//! visitor identification, contact forms, and newsletter signups.
//!
//! Order, contact, and newsletter submissions return uniform outcome
//! types instead of `Result`: every failure mode, transport or server,
//! collapses into a rejected outcome carrying a user-presentable
//! message. Lookup-style calls (`fetch_menu`, `post_event`,
//! `identify`) keep a plain [`ClientResult`] and leave degradation
//! policy to the caller.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NETWORK_ERROR_MESSAGE};

// Re-export shared types for convenience
pub use shared::api::{ContactOutcome, NewsletterOutcome, OrderOutcome};
