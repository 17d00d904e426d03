use byteorder::ByteOrder;
use byteorder::LittleEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::FgsnifferError;

/// Snap length announced in every file header (one full ethernet frame).
pub const DEFAULT_SNAPLEN: u32 = 0x5ee;
pub const FILE_HEADER_LEN: usize = 24;
pub const RECORD_HEADER_LEN: usize = 16;

/// Encode the low 32 bits of `n` as little-endian bytes, whatever the host order is.
///
/// ```rust
/// use fgsniffer::pcap::encode_le32;
///
/// assert_eq!(encode_le32(11259375), [0xef, 0xcd, 0xab, 0x00]);
/// ```
pub fn encode_le32(n: u64) -> [u8; 4] {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, n as u32);
    buf
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum LinkType {
    ETHERNET = 1,
}

impl LinkType {
    pub fn to_u32(self) -> u32 {
        self as u32
    }
    pub fn from_u32(value: u32) -> Option<Self> {
        LinkType::iter().find(|&e| e as u32 == value)
    }
}

// File Header
// from https://www.ietf.org/archive/id/draft-gharris-opsawg-pcap-01.html#name-file-header
//
//                         1                   2                   3
//     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  0 |                          Magic Number                         |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  4 |          Major Version        |         Minor Version         |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  8 |                           Reserved1                           |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// 12 |                           Reserved2                           |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// 16 |                            SnapLen                            |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// 20 |                           LinkType                            |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// 0xA1B2C3D4: seconds plus a fractional field in the records.
    pub magic_number: u32,
    pub major_version: u16,
    pub minor_version: u16,
    reserved1: u32,
    reserved2: u32,
    pub snaplen: u32,
    pub linktype: LinkType,
}

impl Default for FileHeader {
    fn default() -> Self {
        FileHeader {
            magic_number: 0xa1b2c3d4,
            major_version: 2,
            minor_version: 4,
            reserved1: 0,
            reserved2: 0,
            snaplen: DEFAULT_SNAPLEN,
            linktype: LinkType::ETHERNET,
        }
    }
}

impl FileHeader {
    /// Files are always written little-endian.
    pub fn write<W: Write>(&self, fs: &mut W) -> Result<(), FgsnifferError> {
        fs.write_u32::<LittleEndian>(self.magic_number)?;
        fs.write_u16::<LittleEndian>(self.major_version)?;
        fs.write_u16::<LittleEndian>(self.minor_version)?;
        fs.write_u32::<LittleEndian>(self.reserved1)?;
        fs.write_u32::<LittleEndian>(self.reserved2)?;
        fs.write_u32::<LittleEndian>(self.snaplen)?;
        fs.write_u32::<LittleEndian>(self.linktype.to_u32())?;
        Ok(())
    }
    pub fn to_bytes(&self) -> Result<Vec<u8>, FgsnifferError> {
        let mut buf = Vec::with_capacity(FILE_HEADER_LEN);
        self.write(&mut buf)?;
        Ok(buf)
    }
    pub fn read<R: Read>(fs: &mut R) -> Result<FileHeader, FgsnifferError> {
        let magic_number = fs.read_u32::<LittleEndian>()?;
        let major_version = fs.read_u16::<LittleEndian>()?;
        let minor_version = fs.read_u16::<LittleEndian>()?;
        let reserved1 = fs.read_u32::<LittleEndian>()?;
        let reserved2 = fs.read_u32::<LittleEndian>()?;
        let snaplen = fs.read_u32::<LittleEndian>()?;
        let linktype_value = fs.read_u32::<LittleEndian>()?;
        let linktype = match LinkType::from_u32(linktype_value) {
            Some(l) => l,
            None => {
                return Err(FgsnifferError::UnknownLinkType {
                    linktype: linktype_value,
                });
            }
        };
        Ok(FileHeader {
            magic_number,
            major_version,
            minor_version,
            reserved1,
            reserved2,
            snaplen,
            linktype,
        })
    }
}

// Packet Record
// from https://www.ietf.org/archive/id/draft-gharris-opsawg-pcap-01.html#name-packet-record
//                         1                   2                   3
//     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  0 |                      Timestamp (Seconds)                      |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  4 |            Timestamp (Microseconds or nanoseconds)            |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  8 |                    Captured Packet Length                     |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// 12 |                    Original Packet Length                     |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// 16 /                                                               /
//    /                          Packet Data                          /
//    /                        variable length                        /
//    /                                                               /
//    +---------------------------------------------------------------+

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketRecord {
    pub ts_sec: u32,
    /// The fraction exactly as the sniffer printed it, not scaled to micro or nano seconds.
    pub ts_subsec: u32,
    pub captured_packet_length: u32,
    pub original_packet_length: u32,
    pub packet_data: Vec<u8>,
}

impl PacketRecord {
    /// Both lengths are the full payload size, the sniffer never truncates.
    pub fn new(ts_sec: i64, ts_subsec: u64, packet_data: Vec<u8>) -> PacketRecord {
        // u32 is the pcap field width, higher bits are dropped
        let size = packet_data.len() as u32;
        PacketRecord {
            ts_sec: ts_sec as u32,
            ts_subsec: ts_subsec as u32,
            captured_packet_length: size,
            original_packet_length: size,
            packet_data,
        }
    }
    pub fn write<W: Write>(&self, fs: &mut W) -> Result<(), FgsnifferError> {
        fs.write_all(&encode_le32(self.ts_sec as u64))?;
        fs.write_all(&encode_le32(self.ts_subsec as u64))?;
        fs.write_all(&encode_le32(self.captured_packet_length as u64))?;
        fs.write_all(&encode_le32(self.original_packet_length as u64))?;
        fs.write_all(&self.packet_data)?;
        Ok(())
    }
    /// Serialize header and data into one buffer so a single append lands the whole record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FgsnifferError> {
        let mut buf = Vec::with_capacity(RECORD_HEADER_LEN + self.packet_data.len());
        self.write(&mut buf)?;
        Ok(buf)
    }
    pub fn read<R: Read>(fs: &mut R) -> Result<PacketRecord, FgsnifferError> {
        let ts_sec = fs.read_u32::<LittleEndian>()?;
        let ts_subsec = fs.read_u32::<LittleEndian>()?;
        let captured_packet_length = fs.read_u32::<LittleEndian>()?;
        let original_packet_length = fs.read_u32::<LittleEndian>()?;
        let mut data = vec![0u8; captured_packet_length as usize]; // read only capt_len length
        fs.read_exact(&mut data)?;
        Ok(PacketRecord {
            ts_sec,
            ts_subsec,
            captured_packet_length,
            original_packet_length,
            packet_data: data,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Pcap {
    pub header: FileHeader,
    pub records: Vec<PacketRecord>,
}

impl Pcap {
    pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Pcap, FgsnifferError> {
        let mut fs = BufReader::new(File::open(path)?);
        let header = FileHeader::read(&mut fs)?;
        let mut records = Vec::new();
        // a partial record at the end is an error, only a clean EOF stops here
        while !fs.fill_buf()?.is_empty() {
            records.push(PacketRecord::read(&mut fs)?);
        }
        Ok(Pcap { header, records })
    }
}
