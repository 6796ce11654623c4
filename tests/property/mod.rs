//! Property-based tests for path conventions, ledgers, and UI matching

mod layout;
mod ledger;
mod ui_tree;
