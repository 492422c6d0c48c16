//! Program entrypoint.
//!
//! Reads `cluster_classifications.csv` from the working directory and writes
//! `cluster_classifications_cleaned.csv` next to it. Any fatal error is printed and the process
//! exits with status 1.

use anyhow::Result;
use env_logger::Env;

use cluster_cleaner::config::Config;
use cluster_cleaner::process;

fn main() -> Result<()> {
	// Malformed records are reported at `warn`
	env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
	let config = Config::default();
	let written = process::run_files(&config)?;
	println!(
		"Created file {} and successfully wrote {} records to file",
		config.output_path.display(),
		written
	);
	Ok(())
}
