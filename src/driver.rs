use log::debug;
use log::error;
use std::io::BufRead;

use crate::classify::Classifier;
use crate::config::Config;
use crate::demux::Demux;
use crate::error::FgsnifferError;
use crate::packet::Packet;
use crate::registry::CaptureRegistry;

/// Reads a sniffer transcript line by line and writes the packets it describes.
///
/// ```rust,no_run
/// use fgsniffer::Config;
/// use fgsniffer::Pipeline;
///
/// let mut pipeline = Pipeline::new(&Config::default());
/// let stdin = std::io::stdin();
/// let ret = pipeline.run(stdin.lock());
/// for (name, packets) in pipeline.registry().summary() {
///     eprintln!("created output file {} with {} packets.", name, packets);
/// }
/// ret.unwrap();
/// ```
pub struct Pipeline {
    classifier: Classifier,
    demux: Demux,
    // one packet under construction at a time
    packet: Packet,
    lines: usize,
}

impl Pipeline {
    pub fn new(config: &Config) -> Pipeline {
        Pipeline {
            classifier: Classifier::new(config.get_start_time()),
            demux: Demux::new(config),
            packet: Packet::default(),
            lines: 0,
        }
    }
    /// Feed one line of the transcript.
    pub fn feed(&mut self, line: &str) {
        self.lines += 1;
        let m = self.classifier.classify(line);
        if let Some(header) = m.header {
            self.demux.flush(&self.packet);
            self.packet.reset(
                header.epoch_secs,
                header.subsec,
                &header.port,
                header.direction,
            );
        }
        if let Some(hex) = m.hex {
            self.packet.append(&hex);
        }
    }
    /// Write out the packet under construction, if it holds any bytes.
    pub fn finish(&mut self) {
        self.demux.flush(&self.packet);
        self.packet = Packet::default();
    }
    /// Consume `input` to its end. A read error stops reading, but the last
    /// packet is still flushed before the error is returned.
    ///
    /// Lines are split on raw bytes, invalid UTF-8 is replaced rather than
    /// treated as a read error.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<(), FgsnifferError> {
        let mut ret = Ok(());
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }
                    let line = String::from_utf8_lossy(&buf);
                    self.feed(&line);
                }
                Err(e) => {
                    error!("read input failed after {} lines: {}", self.lines, e);
                    ret = Err(FgsnifferError::ReadInputError(e));
                    break;
                }
            }
        }
        self.finish();
        debug!("processed {} lines", self.lines);
        ret
    }
    pub fn registry(&self) -> &CaptureRegistry {
        self.demux.registry()
    }
}
