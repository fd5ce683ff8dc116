//! Utility functions for code generation and input parsing.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Redirect target validation
//! - [`expires_at`] - Expiration timestamp parsing

pub mod code_generator;
pub mod expires_at;
pub mod url_validator;
