//! Tido - a lightweight todo backend
//!
//! This library provides the core functionality for the Tido backend:
//! token-based authentication and per-user todo management.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
