use thiserror::Error;

#[derive(Error, Debug)]
pub enum FgsnifferError {
    #[error("unknown linktype: {linktype}")]
    UnknownLinkType { linktype: u32 },
    #[error("unknown direction token: {d}")]
    UnknownDirection { d: String },
    #[error("unable to create output file {name}: {e}")]
    CreateOutputError { name: String, e: std::io::Error },
    #[error("unable to append to output file {name}: {e}")]
    AppendOutputError { name: String, e: std::io::Error },
    #[error("invalid hex payload ({size} hex digits): {e}")]
    HexPayloadError { size: usize, e: hex::FromHexError },
    #[error("relative timestamp out of range: {secs}s")]
    TimestampOutOfRange { secs: String },
    #[error("read input error")]
    ReadInputError(#[source] std::io::Error),
    #[error("io error")]
    IOError(#[from] std::io::Error),
    #[error("parse time error")]
    ParseTimeError(#[from] chrono::ParseError),
    #[error("parse int error")]
    ParseIntError(#[from] std::num::ParseIntError),
}
