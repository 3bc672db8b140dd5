//! Fixed capacities shared by every world-state implementation.

/// Maximum length of a world-state key, in bytes.
pub const MAX_KEY_LEN: usize = 64;

/// Maximum length of a string value, in bytes.
pub const MAX_STRING_LEN: usize = 128;
