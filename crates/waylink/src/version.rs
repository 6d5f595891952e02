//! Client version identity reported to the server.
//!
//! The server gates protocol features on the client build it is
//! talking to; these constants name the build this crate speaks for.
//! Bump them together when tracking a new server protocol revision.

/// Human-readable client version string.
pub const CLIENT_VERSION: &str = "1.7.2";

/// Numeric build id derived from [`CLIENT_VERSION`] (major*1000 +
/// minor*100 + patch).
pub const CLIENT_BUILD: u32 = 1702;

/// Platform string sent with asset-manifest and remote-config calls.
pub const CLIENT_PLATFORM: &str = "ios";

/// Version-specific hash the signing layer embeds in each envelope.
/// Dispatchers read this; the core never interprets it.
pub const CLIENT_VERSION_HASH: &str =
    "2788184af4a870d72df0fffa22f4e1cae97d9e3f";
