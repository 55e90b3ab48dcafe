//! # gateway-api
//!
//! HTTP API layer for the payment gateway simulator.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - API key middleware in front of invoice routes
//! - REST endpoints for accounts and invoices
//!
//! ## Endpoints
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | GET | `/health` | - | Health check |
//! | POST | `/accounts` | - | Register account |
//! | GET | `/accounts` | `X-API-KEY` | Current account |
//! | POST | `/invoice` | `X-API-KEY` | Create invoice |
//! | GET | `/invoice` | `X-API-KEY` | List invoices |
//! | GET | `/invoice/{id}` | `X-API-KEY` | Get invoice |
//! | PATCH | `/invoice/{id}/status` | `X-API-KEY` | Update pending invoice |

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::API_KEY_HEADER;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
