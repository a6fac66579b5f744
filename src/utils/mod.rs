//! Input limits and small shared helpers.

pub mod validation;
