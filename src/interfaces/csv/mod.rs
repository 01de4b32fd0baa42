//! CSV adapters for replaying workflow commands and reporting claim state.

pub mod command_reader;
pub mod expense_writer;
