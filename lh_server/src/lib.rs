//! HTTP server for Login Hub: password and multi-provider OAuth sign-in.

pub mod api;
pub mod config;
pub mod logging;
