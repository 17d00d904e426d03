use std::str::FromStr;
use strum_macros::AsRefStr;
use strum_macros::Display;
use strum_macros::EnumString;

use crate::error::FgsnifferError;

/// Transit direction printed by the sniffer in verbose mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Direction {
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "out")]
    Out,
    /// Neither direction, e.g. locally generated traffic.
    #[strum(serialize = "--")]
    Unknown,
}

impl Direction {
    pub fn parse(d: &str) -> Result<Direction, FgsnifferError> {
        Direction::from_str(d).map_err(|_| FgsnifferError::UnknownDirection { d: d.to_string() })
    }
}

/// The packet being assembled from one header line and its hex lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    // raw hex digits, two per byte
    payload: String,
    size: usize,
    pub epoch_secs: i64,
    pub subsec: u64,
    /// Interface or port name, empty unless the header was verbose.
    pub port: String,
    pub direction: Option<Direction>,
}

impl Packet {
    pub fn new(epoch_secs: i64, subsec: u64, port: &str, direction: Option<Direction>) -> Packet {
        Packet {
            payload: String::new(),
            size: 0,
            epoch_secs,
            subsec,
            port: port.to_string(),
            direction,
        }
    }
    /// Start over with the fields of a fresh header, dropping any payload.
    pub fn reset(&mut self, epoch_secs: i64, subsec: u64, port: &str, direction: Option<Direction>) {
        *self = Packet::new(epoch_secs, subsec, port, direction);
    }
    /// Append an already space-stripped hex chunk. Nothing is validated until decode.
    pub fn append(&mut self, hex_chunk: &str) {
        self.size += hex_chunk.len() / 2;
        self.payload.push_str(hex_chunk);
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    pub fn size(&self) -> usize {
        self.size
    }
    pub fn payload(&self) -> &str {
        &self.payload
    }
    /// Direction token used in file names and filter matching, empty when absent.
    pub fn direction_str(&self) -> &str {
        match &self.direction {
            Some(d) => d.as_ref(),
            None => "",
        }
    }
    pub fn has_port(&self) -> bool {
        !self.port.is_empty()
    }
    pub fn decode(&self) -> Result<Vec<u8>, FgsnifferError> {
        hex::decode(&self.payload).map_err(|e| FgsnifferError::HexPayloadError {
            size: self.payload.len(),
            e,
        })
    }
}
