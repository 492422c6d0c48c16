//! Record transformation: load identifiers, decompose them, persist the extracted fields.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator};

use crate::config::Config;
use crate::error::{ParseError, TransformError};
use crate::types::{Malformed, Record, RecordSet, RESOURCE_ID_LAYOUT};

type Result<T> = std::result::Result<T, TransformError>;

/// Run Files
///
/// Read identifiers from `config.input_path` and write the cleaned rows to
/// `config.output_path`, returning the number of rows written. An input with no records
/// fails before the output file is created.
pub fn run_files(config: &Config) -> Result<usize> {
	let mut records = load_file(&config.input_path)?;
	ensure_records(&records)?;
	decompose(&mut records);
	persist_file(&config.output_path, &records)?;
	Ok(records.len())
}

/// Run
///
/// Same pipeline as `run_files` over an arbitrary `input` (trait bound `std::io::Read`) and
/// `output` (trait bound `std::io::Write`).
pub fn run<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
	let mut records = load(input)?;
	ensure_records(&records)?;
	decompose(&mut records);
	persist(output, &records)?;
	Ok(records.len())
}

fn ensure_records(records: &RecordSet) -> Result<()> {
	if records.is_empty() {
		return Err(TransformError::EmptyResult);
	}
	log::info!("Loaded {} records", records.len());
	Ok(())
}

/// Load File
pub fn load_file(path: &Path) -> Result<RecordSet> {
	let mut file = File::open(path).map_err(|source| TransformError::Open {
		path: path.to_path_buf(),
		source,
	})?;
	load(&mut file)
}

/// Load
///
/// Read every CSV row from `input` before returning. The first field of each row becomes a
/// record's `raw` value; blank lines are not records. Rows must all have the same number of
/// fields and be valid UTF-8.
pub fn load<R: Read>(input: &mut R) -> Result<RecordSet> {
	let mut contents = Vec::new();
	input
		.read_to_end(&mut contents)
		.map_err(|e| TransformError::Read(e.into()))?;
	check_quotes(&contents).map_err(TransformError::Read)?;

	let mut rdr = csv::ReaderBuilder::new()
		.has_headers(false)
		.from_reader(contents.as_slice());

	let mut records = RecordSet::new();
	for result in rdr.records() {
		let row = result.map_err(|e| TransformError::Read(e.into()))?;
		records.push(Record::new(row.get(0).unwrap_or("")));
	}
	Ok(records)
}

/// Check Quotes
///
/// The `csv` reader recovers from stray quotes by reading them as data. Reject them instead: a
/// `"` may only open a field, and a quoted field must be closed by `"` followed by a delimiter,
/// a line end or the end of input.
fn check_quotes(input: &[u8]) -> std::result::Result<(), ParseError> {
	let mut line = 1;
	let mut i = 0;
	while i < input.len() {
		// `i` is at the start of a field
		if input[i] == b'"' {
			let start = line;
			i += 1;
			loop {
				match input.get(i).copied() {
					None => return Err(ParseError::Quote { line: start }),
					Some(b'"') => match input.get(i + 1).copied() {
						Some(b'"') => i += 2,
						None | Some(b',') | Some(b'\n') => {
							i += 1;
							break;
						}
						Some(b'\r') if input.get(i + 2).copied() == Some(b'\n') => {
							i += 1;
							break;
						}
						Some(_) => return Err(ParseError::Quote { line }),
					},
					Some(b'\n') => {
						line += 1;
						i += 1;
					}
					Some(_) => i += 1,
				}
			}
		} else {
			while let Some(b) = input.get(i).copied() {
				match b {
					b',' | b'\n' => break,
					b'"' => return Err(ParseError::BareQuote { line }),
					_ => i += 1,
				}
			}
		}
		// `i` is at a delimiter, a line end or past the input
		match input.get(i).copied() {
			Some(b'\n') => line += 1,
			Some(b'\r') => {
				line += 1;
				i += 1;
			}
			_ => {}
		}
		i += 1;
	}
	Ok(())
}

/// Decompose
///
/// Split every record in place. Records that don't fit the identifier layout keep empty
/// fields; each is logged as a warning and returned to the caller. Never fatal.
pub fn decompose(records: &mut RecordSet) -> Vec<Malformed> {
	let mut malformed = Vec::new();
	for (i, record) in records.iter_mut().enumerate() {
		match record.decompose(&RESOURCE_ID_LAYOUT) {
			Ok(()) => log::debug!("{:?}", record),
			Err(reason) => {
				let row = i + 1;
				log::warn!(
					"Corrupted input '{}' at row {}: {}, skipping",
					record.raw,
					row,
					reason
				);
				malformed.push(Malformed {
					row,
					raw: record.raw.clone(),
					reason,
				});
			}
		}
	}
	malformed
}

/// Persist File
///
/// Create (or truncate) `path` and write all records to it. Nothing is written if the file
/// can't be created; a failed write leaves whatever was already written in place.
pub fn persist_file(path: &Path, records: &RecordSet) -> Result<()> {
	let mut file = File::create(path).map_err(|source| TransformError::Create {
		path: path.to_path_buf(),
		source,
	})?;
	persist(&mut file, records)?;
	log::info!("Wrote {} records to {}", records.len(), path.display());
	Ok(())
}

/// Persist
///
/// Write one headerless CSV row of `[subscription, resource_group, managed_cluster]` per
/// record to `wtr` (required trait bound `std::io::Write`), in record order. Fields arrive
/// already quoted from `Record::cleaned`, so the writer must not quote them again.
pub fn persist<W: Write>(wtr: &mut W, records: &RecordSet) -> Result<()> {
	let buffered = BufWriter::new(wtr);
	let mut wtr = csv::WriterBuilder::new()
		.has_headers(false)
		.terminator(Terminator::Any(b'\n'))
		.quote_style(QuoteStyle::Never)
		.from_writer(buffered);

	for record in records {
		wtr.serialize(record.cleaned()).map_err(TransformError::Write)?;
	}
	wtr.flush().map_err(|e| TransformError::Write(e.into()))?;
	Ok(())
}
