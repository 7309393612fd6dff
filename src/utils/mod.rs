//! Helpers used across the application:
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`client_ip`] - Client address resolution from forwarded headers
//! - [`user_agent`] - Heuristic device classification
//! - [`db_error`] - PostgreSQL constraint violation classification
//! - [`url_validator`] - Destination URL validation

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
pub mod user_agent;
