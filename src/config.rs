//! Run configuration.

use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "cluster_classifications.csv";
pub const DEFAULT_OUTPUT: &str = "cluster_classifications_cleaned.csv";

/// Where to read identifiers from and where to write the cleaned rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub input_path: PathBuf,
	pub output_path: PathBuf,
}

impl Config {
	pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
		Self {
			input_path: input_path.into(),
			output_path: output_path.into(),
		}
	}
}

impl Default for Config {
	/// Fixed file names, relative to the working directory.
	fn default() -> Self {
		Self::new(DEFAULT_INPUT, DEFAULT_OUTPUT)
	}
}
