//! End-to-end API tests.
//!
//! These tests exercise the full HTTP surface against a live PostgreSQL
//! (DATABASE_URL) and an S3-compatible store (S3_ENDPOINT, MinIO in
//! development). Each test builds its own isolated plan/case tree, so
//! the suite can run against a shared database.


mod attachment_tests;
mod case_tests;
mod plan_tests;
mod result_step_tests;
mod step_tests;
