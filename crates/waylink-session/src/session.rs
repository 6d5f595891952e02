//! Session and device identity: the context every dispatch carries.
//!
//! A session is one logical conversation with the server, created once
//! per client lifetime (or supplied by the caller to resume an earlier
//! one). The randomized fields exist so concurrent clients don't
//! collide and so request timing looks like a real app launch rather
//! than an instant-on bot — which is why all randomness comes through
//! an injected `Rng`, never ambient process state.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive lower bound for generated request ids (2^62). The server
/// reserves the lower id space for its own bookkeeping.
const REQUEST_ID_MIN: u64 = 1 << 62;
/// Exclusive upper bound for generated request ids (2^63).
const REQUEST_ID_MAX: u64 = 1 << 63;

/// Generated start-time jitter range, milliseconds. A real client never
/// fires its first request at exactly t=0 after launch.
const START_JITTER_MS: std::ops::Range<u64> = 750..2000;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One logical conversation with the server.
///
/// The identity fields are fixed at creation. `settings_hash` and
/// `fingerprint` are negotiated by the server and written back by the
/// caller as responses arrive — this crate only stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Random 64-bit id namespacing this session's requests.
    pub request_id: u64,
    /// Wall-clock start of the session, milliseconds since epoch.
    pub started_at_ms: u64,
    /// Randomized launch jitter added to relative timestamps.
    pub start_jitter_ms: u64,
    /// Hash of the last settings payload the server handed us, echoed
    /// back on settings downloads so the server can skip unchanged data.
    pub settings_hash: Option<String>,
    /// Opaque session fingerprint negotiated by the server.
    pub fingerprint: Option<Vec<u8>>,
}

impl Session {
    /// Generates a fresh session from an injected randomness source.
    ///
    /// Tests pass a seeded rng for reproducible ids; production callers
    /// usually go through [`Session::generate_random`].
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, now_ms: u64) -> Self {
        Self {
            request_id: rng.random_range(REQUEST_ID_MIN..REQUEST_ID_MAX),
            started_at_ms: now_ms,
            start_jitter_ms: rng.random_range(START_JITTER_MS),
            settings_hash: None,
            fingerprint: None,
        }
    }

    /// [`Session::generate`] with the thread-local rng.
    pub fn generate_random(now_ms: u64) -> Self {
        Self::generate(&mut rand::rng(), now_ms)
    }

    /// Milliseconds since the session started, for relative timestamps
    /// in dispatch envelopes. Saturates rather than panicking if the
    /// caller's clock moves backwards.
    pub fn elapsed_since_start(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }
}

// ---------------------------------------------------------------------------
// DeviceInfo
// ---------------------------------------------------------------------------

/// The platform a device claims to run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

/// The device identity reported alongside signed requests.
///
/// An explicit named-field struct: callers override the fields they
/// care about and leave the rest at handset-plausible defaults, instead
/// of threading a dozen optional parameters through a constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// 40-hex-char device id (20 random bytes for generated devices).
    pub device_id: String,
    pub platform: Platform,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub model_boot: Option<String>,
    pub hardware_manufacturer: Option<String>,
    pub hardware_model: Option<String>,
    pub firmware_brand: Option<String>,
    pub firmware_type: Option<String>,
}

impl DeviceInfo {
    /// A default device with a freshly randomized id.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            device_id: generate_device_id(rng),
            ..Self::default()
        }
    }

    /// [`DeviceInfo::generate`] with the thread-local rng.
    pub fn generate_random() -> Self {
        Self::generate(&mut rand::rng())
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            platform: Platform::Ios,
            brand: Some("Apple".into()),
            model: Some("iPhone".into()),
            model_boot: Some("iPhone8,2".into()),
            hardware_manufacturer: Some("Apple".into()),
            hardware_model: Some("N66mAP".into()),
            firmware_brand: Some("iPhone OS".into()),
            firmware_type: Some("9.3.3".into()),
        }
    }
}

/// 20 random bytes as a 40-character lowercase hex string.
fn generate_device_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 20] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
