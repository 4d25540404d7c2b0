pub mod admin;
pub mod cli;
pub mod config;
pub mod notice;
pub mod purge;
pub mod queue;
pub mod roles;
pub mod shutdown;
pub mod store;

#[cfg(test)]
mod tests;
