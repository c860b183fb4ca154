//! Shared test fixtures.

pub(crate) mod helpers;
