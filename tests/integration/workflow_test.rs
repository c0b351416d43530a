//! League workflow integration tests
//!
//! End-to-end scenarios over the workflow services and the in-memory store.

#![allow(dead_code)]

mod common;
mod workflows;
