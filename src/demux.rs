use log::error;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::FgsnifferError;
use crate::packet::Direction;
use crate::packet::Packet;
use crate::pcap::PacketRecord;
use crate::registry::CaptureRegistry;
use crate::registry::Destination;

const PATH_UNSAFE: &[char] = &['[', ']', '{', '}', '/', '\\', '*', '!', '?'];
const FILTER_ANY: &str = "any";

/// Replace characters that are unsafe in a file name with `_`.
pub fn sanitize_port(port: &str) -> String {
    port.replace(PATH_UNSAFE, "_")
}

/// `<base>.pcap`, or `<base>-<direction>-<port>.pcap` when the header named a port.
pub fn file_name(base_name: &str, packet: &Packet) -> String {
    if packet.has_port() {
        format!(
            "{}-{}-{}.pcap",
            base_name,
            packet.direction_str(),
            sanitize_port(&packet.port)
        )
    } else {
        format!("{}.pcap", base_name)
    }
}

/// Whether `packet` is copied to the pass-through destination for `filter`.
pub fn passthrough_match(filter: &str, packet: &Packet) -> bool {
    !packet.has_port()
        || packet.port == filter
        || filter == FILTER_ANY
        || filter == packet.direction_str()
        || packet.direction == Some(Direction::Unknown)
}

/// Routes finished packets into their capture files.
pub struct Demux {
    base_name: String,
    output_dir: PathBuf,
    filter: Option<String>,
    passthrough: Destination,
    registry: CaptureRegistry,
}

impl Demux {
    pub fn new(config: &Config) -> Demux {
        Demux {
            base_name: config.base_name.clone(),
            output_dir: config.output_dir.clone(),
            filter: config.filter.clone(),
            passthrough: config.passthrough.clone(),
            registry: CaptureRegistry::new(),
        }
    }
    pub fn destination(&self, packet: &Packet) -> Destination {
        Destination::File(self.output_dir.join(file_name(&self.base_name, packet)))
    }
    /// Write `packet` to its file and, when it matches the filter, to the pass-through.
    /// Failures are logged and the run goes on.
    pub fn flush(&mut self, packet: &Packet) {
        if packet.is_empty() {
            return;
        }
        let record = match Self::serialize(packet) {
            Ok(r) => r,
            Err(e) => {
                error!("drop packet at {}.{}: {}", packet.epoch_secs, packet.subsec, e);
                return;
            }
        };
        let dest = self.destination(packet);
        if let Err(e) = self.registry.append(&dest, &record) {
            error!("{}", e);
        }
        if let Some(filter) = &self.filter {
            if passthrough_match(filter, packet) {
                if let Err(e) = self.registry.append(&self.passthrough, &record) {
                    error!("{}", e);
                }
            }
        }
    }
    fn serialize(packet: &Packet) -> Result<Vec<u8>, FgsnifferError> {
        let data = packet.decode()?;
        PacketRecord::new(packet.epoch_secs, packet.subsec, data).to_bytes()
    }
    pub fn registry(&self) -> &CaptureRegistry {
        &self.registry
    }
}
