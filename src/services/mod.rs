// src/services/mod.rs
//
// Core of the borrowing workflow. Registry and ledger functions take a
// connection so callers decide whether they run inside a transaction.

pub mod appointments;
pub mod books;
pub mod borrowing;
pub mod rating;
