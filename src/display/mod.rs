//! Terminal output formatting for verified tokens.

pub mod claims_printer;
