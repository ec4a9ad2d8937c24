//! Unit tests for jiffyi
//!
//! Services run against in-memory ports and paused time; adapters run against
//! local fakes. Nothing here reaches a real JiffyBox or ssh server.

mod architecture;
mod helpers;
mod mocks;
