//! # Yatube Core
//!
//! The domain layer of Yatube: records, ports, pagination and the services
//! that hold the posting, commenting and following rules.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod messages;
pub mod pagination;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, PageWindow, Paginator};
