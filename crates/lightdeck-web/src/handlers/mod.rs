//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the web server.

pub mod config;
pub mod pages;
pub mod session;
