//! HTTP interface of the server.
//!
//! Defines the API routes, the published endpoint route, and the middleware stack.

pub mod api;
pub mod middleware;
pub mod router;
