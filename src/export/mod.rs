//! Export module for the expense tracker
//!
//! Expenses are exported as a JSON array that the import command reads back.

pub mod json;

pub use json::{
    default_export_filename, export_expenses_json, export_to_file, load_expenses_json,
    ExportedExpense,
};
