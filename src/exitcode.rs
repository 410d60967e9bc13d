//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed edit script)
pub const DATAERR: i32 = 65;

/// Cannot open input
pub const NOINPUT: i32 = 66;

/// Internal software error (broken tree invariant)
pub const SOFTWARE: i32 = 70;

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
