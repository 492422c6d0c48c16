//! Global type definitions.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Character separating the segments of a resource identifier.
pub const SEGMENT_DELIMITER: char = '/';

/// Ordered records, in input file order.
pub type RecordSet = Vec<Record>;

/// Positions of the named fields within a `/`-delimited resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
	pub subscription: usize,
	pub resource_group: usize,
	pub managed_cluster: usize,
	pub min_segments: usize,
}

/// `/subscriptions/<sub>/resourceGroups/<rg>/providers/<ns>/managedClusters/<mc>` once the
/// leading empty segment is counted.
pub const RESOURCE_ID_LAYOUT: SegmentLayout = SegmentLayout {
	subscription: 2,
	resource_group: 4,
	managed_cluster: 8,
	min_segments: 5,
};

/// Why a record was left with empty derived fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
	TooFewSegments { found: usize },
	MissingSegment { index: usize, found: usize },
}

/// Non-fatal diagnostic for a single skipped record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformed {
	/// 1-based position of the record in the input.
	pub row: usize,
	pub raw: String,
	pub reason: MalformedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
	pub raw: String,
	pub subscription: String,
	pub resource_group: String,
	pub managed_cluster: String,
}

/// One output row. Field order is the column order.
///
/// Each field is already CSV-encoded by `quote_field` and must be written verbatim.
#[derive(Debug, Serialize)]
pub struct CleanedRow<'a> {
	pub subscription: Cow<'a, str>,
	pub resource_group: Cow<'a, str>,
	pub managed_cluster: Cow<'a, str>,
}

/// Quote Field
///
/// Quote `field` when it contains a delimiter, a quote or a line break, starts with
/// whitespace, or is exactly `\.`. Embedded quotes are doubled. Empty fields stay bare.
pub fn quote_field(field: &str) -> Cow<'_, str> {
	let needs_quotes = field == "\\."
		|| field.contains([',', '"', '\r', '\n'])
		|| field.starts_with(char::is_whitespace);
	if needs_quotes {
		Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
	} else {
		Cow::Borrowed(field)
	}
}

impl SegmentLayout {
	/// Pick the three named segments, or explain why they can't all be taken.
	///
	/// Every index is checked on its own, so a layout whose highest index lies beyond
	/// `min_segments` never reads out of bounds.
	pub fn extract<'a>(&self, segments: &[&'a str]) -> Result<[&'a str; 3], MalformedReason> {
		let found = segments.len();
		if found < self.min_segments {
			return Err(MalformedReason::TooFewSegments { found });
		}
		let pick = |index: usize| {
			segments
				.get(index)
				.copied()
				.ok_or(MalformedReason::MissingSegment { index, found })
		};
		Ok([
			pick(self.subscription)?,
			pick(self.resource_group)?,
			pick(self.managed_cluster)?,
		])
	}
}

impl Record {
	pub fn new(raw: impl Into<String>) -> Self {
		Self {
			raw: raw.into(),
			..Self::default()
		}
	}

	/// Split `raw` and fill in all three derived fields, or none of them.
	pub fn decompose(&mut self, layout: &SegmentLayout) -> Result<(), MalformedReason> {
		let segments: Vec<&str> = self.raw.split(SEGMENT_DELIMITER).collect();
		let [subscription, resource_group, managed_cluster] = layout.extract(&segments)?;
		self.subscription = subscription.to_owned();
		self.resource_group = resource_group.to_owned();
		self.managed_cluster = managed_cluster.to_owned();
		Ok(())
	}

	pub fn cleaned(&self) -> CleanedRow<'_> {
		CleanedRow {
			subscription: quote_field(&self.subscription),
			resource_group: quote_field(&self.resource_group),
			managed_cluster: quote_field(&self.managed_cluster),
		}
	}
}

impl fmt::Display for MalformedReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MalformedReason::TooFewSegments { found } => {
				write!(f, "too few segments ({})", found)
			}
			MalformedReason::MissingSegment { index, found } => {
				write!(f, "missing segment {} ({} segments)", index, found)
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use rstest::*;

	const FULL_ID: &str =
		"/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.ContainerService/managedClusters/mc-1";

	#[rstest]
	fn decompose_full_identifier() {
		let mut record = Record::new(FULL_ID);
		assert!(record.decompose(&RESOURCE_ID_LAYOUT).is_ok());
		assert_eq!(record.subscription, "sub-1");
		assert_eq!(record.resource_group, "rg-1");
		assert_eq!(record.managed_cluster, "mc-1");
		assert_eq!(record.raw, FULL_ID);
	}

	#[rstest]
	#[case("a/b/c", 3)]
	#[case("", 1)]
	#[case("a/b/c/d", 4)]
	fn too_few_segments_leaves_record_empty(#[case] raw: &str, #[case] found: usize) {
		let mut record = Record::new(raw);
		let reason = record.decompose(&RESOURCE_ID_LAYOUT);
		assert_eq!(reason, Err(MalformedReason::TooFewSegments { found }));
		assert_eq!(record, Record::new(raw));
	}

	#[rstest]
	#[case("/s/sub/r/rg", 5)]
	#[case("/s/sub/r/rg/p/ns/m", 8)]
	fn short_of_managed_cluster_is_missing_segment(#[case] raw: &str, #[case] found: usize) {
		let mut record = Record::new(raw);
		let reason = record.decompose(&RESOURCE_ID_LAYOUT);
		assert_eq!(
			reason,
			Err(MalformedReason::MissingSegment { index: 8, found })
		);
		// No partial population
		assert!(record.subscription.is_empty());
		assert!(record.resource_group.is_empty());
		assert!(record.managed_cluster.is_empty());
	}

	#[rstest]
	fn extra_segments_are_ignored() {
		let mut record = Record::new(format!("{}/agentPools/np1", FULL_ID));
		assert!(record.decompose(&RESOURCE_ID_LAYOUT).is_ok());
		assert_eq!(record.managed_cluster, "mc-1");
	}

	#[rstest]
	fn layout_extract_is_independent_of_record() {
		let segments = ["", "x", "sub", "y", "rg", "", "", "", "mc"];
		assert_eq!(RESOURCE_ID_LAYOUT.extract(&segments), Ok(["sub", "rg", "mc"]));
	}

	#[rstest]
	#[case("rg-1", "rg-1")]
	#[case("", "")]
	#[case(" rg", "\" rg\"")]
	#[case("\tmc", "\"\tmc\"")]
	#[case("a,b", "\"a,b\"")]
	#[case("a\"b", "\"a\"\"b\"")]
	#[case("a\nb", "\"a\nb\"")]
	#[case("\\.", "\"\\.\"")]
	#[case("rg ", "rg ")]
	fn quote_field_cases(#[case] field: &str, #[case] expected: &str) {
		assert_eq!(quote_field(field), expected);
	}

	#[rstest]
	fn reason_display() {
		let reason = MalformedReason::MissingSegment { index: 8, found: 6 };
		assert_eq!(reason.to_string(), "missing segment 8 (6 segments)");
	}
}
