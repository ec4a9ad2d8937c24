//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP calls to the hosting
//! API, process execution, remote shells and local files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod api;
pub mod command_runner;
pub mod config;
pub mod scripts;
pub mod selection;
pub mod ssh;
