//! Convert the text output of the FortiGate `diagnose sniffer packet` command
//! into pcap files.
//!
//! Every header line of the transcript starts a packet and the `0x....` lines
//! after it carry the packet bytes. Packets are split into one file per
//! interface and direction when the dump was taken in verbose mode.
use std::result;

pub mod classify;
pub mod config;
pub mod demux;
pub mod driver;
pub mod error;
pub mod packet;
pub mod pcap;
pub mod registry;

pub use config::Config;
pub use driver::Pipeline;
pub use error::FgsnifferError;
pub use packet::Direction;
pub use packet::Packet;
pub use registry::CaptureRegistry;
pub use registry::Destination;

pub type Result<T, E = error::FgsnifferError> = result::Result<T, E>;
