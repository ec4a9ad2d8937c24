//! Integration tests for jiffyi
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! API calls go to a local wiremock server or to a closed port; nothing
//! reaches the real JiffyBox API.

mod cli_tests;
