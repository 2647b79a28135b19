//! Request gates: activation check and admin session extraction.

pub mod auth;
