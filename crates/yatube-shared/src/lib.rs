//! # Yatube Shared
//!
//! Wire types shared between the server and its clients: the page context
//! documents handlers render, and RFC 7807 error bodies.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
