use chrono::DateTime;
use chrono::Local;
use chrono::NaiveDateTime;
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::FgsnifferError;
use crate::packet::Direction;

// 2024-01-15 14:23:45.123456 ...
static HEAD_LINE_ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9-]+ [0-9][0-9]:[0-9][0-9]:[0-9][0-9])\.([0-9]+) .*$")
        .expect("absolute header regex")
});
// 12.345678 ...
static HEAD_LINE_RELATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]+) .*$").expect("relative header regex"));
// .345678 port1 in ...
static HEAD_LINE_VERBOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[0-9]+ ([^ ]+) (in|out|--) ").expect("verbose header regex")
});
// 0x0010\t 4500 003c ...
static HEX_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0x([0-9a-f]+)[ |\t]+([0-9a-f ]+).*$").expect("hex line regex")
});

const ABSOLUTE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp and interface fields taken from a header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub epoch_secs: i64,
    pub subsec: u64,
    pub port: String,
    pub direction: Option<Direction>,
}

/// Result of running every recognizer over one line.
///
/// The header recognizers are not exclusive, each flag is set on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMatch {
    pub absolute: bool,
    pub relative: bool,
    pub verbose: bool,
    /// Set when `absolute` or `relative` matched.
    pub header: Option<Header>,
    /// Hex digits of a payload line with the spaces removed.
    pub hex: Option<String>,
}

impl LineMatch {
    pub fn is_header(&self) -> bool {
        self.absolute || self.relative
    }
}

pub struct Classifier {
    start: DateTime<Local>,
}

impl Classifier {
    /// `start` anchors relative timestamps.
    pub fn new(start: DateTime<Local>) -> Classifier {
        Classifier { start }
    }
    pub fn classify(&self, line: &str) -> LineMatch {
        let mut ret = LineMatch::default();
        let mut epoch_secs = 0;
        let mut subsec_text = "";

        if let Some(caps) = HEAD_LINE_ABSOLUTE.captures(line) {
            ret.absolute = true;
            epoch_secs = parse_absolute(&caps[1]).unwrap_or_else(|e| {
                warn!("unable to parse header date {}: {}", &caps[1], e);
                0
            });
            subsec_text = caps.get(2).map_or("", |m| m.as_str());
        }
        if let Some(caps) = HEAD_LINE_RELATIVE.captures(line) {
            ret.relative = true;
            // first recognizer wins the timestamp
            if !ret.absolute {
                epoch_secs = relative_epoch(&self.start, &caps[1]).unwrap_or_else(|e| {
                    warn!("unable to parse relative time {}: {}", &caps[1], e);
                    self.start.timestamp()
                });
                subsec_text = caps.get(2).map_or("", |m| m.as_str());
            }
        }

        if ret.is_header() {
            let subsec = subsec_text.parse::<u64>().unwrap_or_else(|e| {
                warn!("unable to parse sub-second value {}: {}", subsec_text, e);
                0
            });
            let mut header = Header {
                epoch_secs,
                subsec,
                ..Default::default()
            };
            if let Some(caps) = HEAD_LINE_VERBOSE.captures(line) {
                ret.verbose = true;
                header.port = caps[1].to_string();
                header.direction = match Direction::parse(&caps[2]) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                };
            }
            ret.header = Some(header);
        }

        if let Some(caps) = HEX_LINE.captures(line) {
            ret.hex = Some(caps[2].replace(' ', ""));
        }
        ret
    }
}

/// Seconds since the epoch for a `YYYY-MM-DD HH:MM:SS` UTC date.
pub fn parse_absolute(date: &str) -> Result<i64, FgsnifferError> {
    let dt = NaiveDateTime::parse_from_str(date, ABSOLUTE_FORMAT)?;
    Ok(dt.and_utc().timestamp())
}

/// Whole seconds of `start` plus the offset printed in a relative header.
pub fn relative_epoch(start: &DateTime<Local>, secs: &str) -> Result<i64, FgsnifferError> {
    let offset = secs.parse::<i64>()?;
    match start.timestamp().checked_add(offset) {
        Some(t) => Ok(t),
        None => Err(FgsnifferError::TimestampOutOfRange {
            secs: secs.to_string(),
        }),
    }
}
