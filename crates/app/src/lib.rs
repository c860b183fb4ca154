//! Storefront client state: the remote API, the mutation coordinator and the
//! cart, order and catalog stores built on it.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod ids;
pub mod mutations;
pub mod observability;

#[cfg(test)]
mod test;
