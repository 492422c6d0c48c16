//! Fatal errors. Any of these aborts the run.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
	#[error("unable to open {}", path.display())]
	Open { path: PathBuf, source: io::Error },

	#[error("cannot read file contents")]
	Read(#[source] ParseError),

	#[error("unable to extract records")]
	EmptyResult,

	#[error("unable to create {}", path.display())]
	Create { path: PathBuf, source: io::Error },

	#[error("unable to write records")]
	Write(#[source] csv::Error),
}

/// Why the input could not be read as CSV.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error(transparent)]
	Io(#[from] io::Error),

	#[error(transparent)]
	Csv(#[from] csv::Error),

	#[error("bare \" in non-quoted field on line {line}")]
	BareQuote { line: u64 },

	#[error("extraneous or missing \" in quoted field on line {line}")]
	Quote { line: u64 },
}
