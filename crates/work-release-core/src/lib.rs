//! Core types, rules and trait definitions for the work-release engine.
//!
//! This crate is deliberately free of HTTP and database dependencies. Every
//! lifecycle rule lives here as a pure function over plain structs; storage
//! backends implement [`store::WorkReleaseStore`] and run those rules inside
//! their own transactions. [`engine::Engine`] binds a store to a
//! [`directory::SubjectDirectory`] and is what outer layers call.

pub mod actor;
pub mod assignment;
pub mod attendance;
pub mod directory;
pub mod eligibility;
pub mod employer;
pub mod engine;
pub mod error;
pub mod report;
pub mod schedule;
pub mod store;

mod validate;

pub use error::{DomainError, Entity, Error, ErrorKind, Result};
