//! HTTP integration tests
//!
//! Drives the composed router with signed bearer tokens.

#![allow(dead_code)]

mod api;
mod common;
