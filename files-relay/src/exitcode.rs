//! Process exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: u8 = 0;

/// Command line usage error: unknown operation, missing path or file id
pub const USAGE: u8 = 64;

/// Data format error: file content not valid in the declared encoding
pub const DATAERR: u8 = 65;

/// Cannot open input: path is not an existing regular file
pub const NOINPUT: u8 = 66;

/// Service unavailable: the files API call failed
pub const UNAVAILABLE: u8 = 69;

/// Internal software error
pub const SOFTWARE: u8 = 70;

/// Input/output error while reading the file
pub const IOERR: u8 = 74;

/// Permission denied: no credential could be obtained
pub const NOPERM: u8 = 77;

/// Configuration error
pub const CONFIG: u8 = 78;
