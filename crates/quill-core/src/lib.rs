//! # Quill Core
//!
//! The domain layer of the Quill blog service.
//! This crate contains the post model, request validation rules and the
//! repository port, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::RepoError;
pub use validation::{Validator, Violation};
