//! Line parser — turns one carbon `creates.log` line into a [`Datasource`].
//!
//! A line announcing a new series looks like
//!
//! ```text
//! 24/08/2014 17:59:53 :: [creates] creating database file /opt/graphite/storage/whisper/host/cpu.wsp (archive=...)
//! ```
//!
//! optionally prefixed by whatever the process supervisor prepends
//! (`launchctl-carbon.stdout:`) and with or without the `[creates]` tag. The
//! series name is the path below the `whisper/` storage root with the `.wsp`
//! extension removed and every `/` replaced by `.`.
//!
//! Parsing is pure: no state, no I/O, no logging. Lines that do not match are
//! not errors.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::types::{is_valid_name, unknown_created_at, Datasource};

/// Timestamp layout embedded in carbon log lines: `DD/MM/YYYY HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

static CREATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<ts>\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}) :: (?:\[creates\] )?creating database file (?P<file>.*?/whisper/(?P<rel>.*?)\.wsp) (?P<params>.*)$",
    )
    .expect("create-line pattern is a valid regex")
});

/// What a single line turned into. Only [`LineOutcome::Record`] carries data;
/// the two miss variants exist so callers can count them separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Record(Datasource),
    /// The line is not a "creating database file" announcement.
    NoMatch,
    /// The line matched but the derived name is empty or ends with a dot.
    InvalidName,
}

/// Parse a raw log line. Returns `None` for every kind of miss.
pub fn parse_line(line: &str) -> Option<Datasource> {
    match classify_line(line) {
        LineOutcome::Record(ds) => Some(ds),
        LineOutcome::NoMatch | LineOutcome::InvalidName => None,
    }
}

/// Parse a raw log line, keeping the reason when no record is produced.
pub fn classify_line(line: &str) -> LineOutcome {
    let Some(caps) = CREATE_LINE.captures(line) else {
        return LineOutcome::NoMatch;
    };

    let name = series_name(&caps["rel"]);
    if !is_valid_name(&name) {
        return LineOutcome::InvalidName;
    }

    LineOutcome::Record(Datasource {
        name,
        created_at: parse_timestamp(&caps["ts"]),
        params: caps["params"].to_string(),
        filename: caps["file"].to_string(),
    })
}

/// Storage-relative path (extension already stripped) to dotted series name.
pub fn series_name(relative_path: &str) -> String {
    relative_path.replace('/', ".")
}

/// Parse a `DD/MM/YYYY HH:MM:SS` timestamp as UTC, falling back to
/// [`unknown_created_at`] when it is not a real calendar date.
pub fn parse_timestamp(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|_| unknown_created_at())
}
