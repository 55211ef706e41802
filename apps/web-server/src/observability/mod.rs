//! Observability - per-request ids tied into tracing spans.

mod request_id;

pub use request_id::RequestIdMiddleware;
