//! SQLite storage for the event lifecycle.
//!
//! Owns all SQL. The atomic primitives live here: the conditional capacity
//! increment, the one-way attendance flip, the unique-index-backed certificate
//! insert, and the default-template swap.

mod certificates;
mod db;
mod events;
mod participants;
mod templates;

#[cfg(test)]
mod tests;

pub use db::Database;
pub use participants::InsertOutcome;
