//! Decompose resource identifiers read from a CSV file into subscription, resource group and
//! managed-cluster columns.

pub mod config;
pub mod error;
pub mod process;
pub mod types;
