use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use crate::error::FgsnifferError;
use crate::pcap::FileHeader;

pub const STDOUT_NAME: &str = "/dev/stdout";

/// Where a capture stream ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => write!(f, "{}", STDOUT_NAME),
        }
    }
}

impl Destination {
    /// Truncate or create the target and write the global header.
    fn create(&self) -> Result<(), FgsnifferError> {
        let header = FileHeader::default().to_bytes()?;
        let ret = match self {
            Destination::File(path) => File::create(path).and_then(|mut fs| fs.write_all(&header)),
            Destination::Stdout => write_stdout(&header),
        };
        ret.map_err(|e| FgsnifferError::CreateOutputError {
            name: self.to_string(),
            e,
        })
    }
    /// The file is opened for this write only and closed on return.
    fn append(&self, data: &[u8]) -> Result<(), FgsnifferError> {
        let ret = match self {
            Destination::File(path) => OpenOptions::new()
                .append(true)
                .open(path)
                .and_then(|mut fs| fs.write_all(data)),
            Destination::Stdout => write_stdout(data),
        };
        ret.map_err(|e| FgsnifferError::AppendOutputError {
            name: self.to_string(),
            e,
        })
    }
}

fn write_stdout(data: &[u8]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(data)?;
    out.flush()
}

#[derive(Debug, Clone)]
struct Entry {
    dest: Destination,
    packets: usize,
}

/// Every output created during a run and the number of records it holds.
#[derive(Debug, Default)]
pub struct CaptureRegistry {
    pcaps: BTreeMap<String, Entry>,
}

impl CaptureRegistry {
    pub fn new() -> CaptureRegistry {
        CaptureRegistry::default()
    }
    /// Create `dest` with its header the first time it is seen.
    /// A failed creation leaves no entry, so the next record tries again.
    pub fn ensure(&mut self, dest: &Destination) -> Result<(), FgsnifferError> {
        let name = dest.to_string();
        if self.pcaps.contains_key(&name) {
            return Ok(());
        }
        dest.create()?;
        debug!("created output file {}", name);
        self.pcaps.insert(
            name,
            Entry {
                dest: dest.clone(),
                packets: 0,
            },
        );
        Ok(())
    }
    /// Append one serialized record, counting it only when the write went through.
    pub fn append(&mut self, dest: &Destination, record: &[u8]) -> Result<(), FgsnifferError> {
        self.ensure(dest)?;
        let name = dest.to_string();
        if let Some(entry) = self.pcaps.get_mut(&name) {
            entry.dest.append(record)?;
            entry.packets += 1;
            debug!("appended {} bytes to {} ({} packets)", record.len(), name, entry.packets);
        }
        Ok(())
    }
    pub fn count(&self, name: &str) -> Option<usize> {
        self.pcaps.get(name).map(|e| e.packets)
    }
    pub fn len(&self) -> usize {
        self.pcaps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pcaps.is_empty()
    }
    /// Output names with their record counts, sorted by name.
    pub fn summary(&self) -> Vec<(String, usize)> {
        self.pcaps
            .iter()
            .map(|(name, e)| (name.clone(), e.packets))
            .collect()
    }
}
