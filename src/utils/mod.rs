//! Shared helpers for dates and random digit strings

pub mod common;
pub mod id_gen;
