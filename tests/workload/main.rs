//! Workload integration tests
//!
//! Seeding, transfer atomicity, harness accounting and full runs against a
//! real store file.

#[path = "../common/mod.rs"]
mod common;

mod end_to_end;
mod harness;
mod seeding;
mod transfer;
