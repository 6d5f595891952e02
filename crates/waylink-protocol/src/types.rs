//! Core protocol types: the request catalog and dispatch context.
//!
//! The server's API surface is a numbered catalog of call types. The
//! catalog is *data*, not logic — every entry behaves identically from
//! the orchestration core's point of view (an id, an opaque payload, a
//! response decoder). The enum below pins the ids; the per-call payload
//! shapes live with the caller-side builders.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// RequestType — the call catalog
// ---------------------------------------------------------------------------

/// Identifies one call type in the server's RPC catalog.
///
/// The discriminants are the wire ids the server assigns. They are not
/// contiguous — the server groups them by family (player/account calls
/// below 100, map and world interaction in the 100s, anti-automation
/// checks in the 600s) and has retired some ids over time.
///
/// `#[repr(u32)]` fixes the in-memory discriminant so `as u32` is the
/// wire id, with [`RequestType::from_wire`] for the reverse direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[repr(u32)]
pub enum RequestType {
    /// Placeholder id; never dispatched.
    MethodUnset = 0,

    // -- Player / account --------------------------------------------------
    /// Report the player's current coordinates to the server.
    PlayerUpdate = 1,
    /// Fetch the player's own profile (locale-scoped).
    GetPlayer = 2,
    /// Fetch the player's inventory (supports delta timestamps).
    GetInventory = 4,
    /// Download server-side client settings (hash-gated).
    DownloadSettings = 5,
    /// Download the asset manifest for the current platform.
    DownloadAssetManifest = 6,
    /// Fetch the remote config version for the current client build.
    DownloadRemoteConfig = 7,

    // -- Map & world interaction -------------------------------------------
    /// Spin a beacon (point of interest) for items.
    BeaconSearch = 101,
    /// Start an encounter with a wild creature.
    Encounter = 102,
    /// Throw at an encountered creature.
    Capture = 103,
    /// Fetch details for one beacon.
    BeaconDetails = 104,
    /// Query map objects for a set of grid cells.
    MapScan = 106,
    /// Station a creature at a beacon.
    BeaconDeploy = 110,
    /// Recall a stationed creature.
    BeaconRecall = 111,
    /// Release a creature from the player's collection.
    Release = 112,
    /// Apply a healing item to a creature.
    UseHealItem = 113,
    /// Use a capture-assist item mid-encounter.
    UseCaptureItem = 114,
    /// Revive a fainted creature.
    UseReviveItem = 116,

    // -- Social / progression ----------------------------------------------
    /// Fetch another player's public profile.
    GetPlayerProfile = 121,
    /// Evolve a creature.
    Evolve = 125,
    /// Collect any eggs that hatched since the last check.
    GetHatchedEggs = 126,
    /// Claim the rewards for a newly reached level.
    LevelUpRewards = 128,
    /// Check for badges awarded since the last check.
    CheckAwardedBadges = 129,
    /// Recycle inventory items for space.
    RecycleItem = 137,
    /// Collect the daily login bonus.
    CollectDailyBonus = 138,
    /// Activate an XP boost item.
    UseXpBoost = 139,
    /// Place an egg into an incubator.
    UseEggIncubator = 140,
    /// Activate a lure at the player's position.
    UseLure = 141,
    /// Mark a creature as favorite (or clear the flag).
    SetFavorite = 148,
    /// Rename a creature.
    Nickname = 149,
    /// Equip a badge on the player's profile.
    EquipBadge = 150,
    /// Update marketing/push contact preferences.
    SetContactSettings = 151,
    /// Update the player's avatar.
    SetAvatar = 152,
    /// Pick the player's team.
    SetTeam = 153,
    /// Mark tutorial steps complete.
    MarkTutorialComplete = 154,

    // -- Anti-automation ----------------------------------------------------
    /// Poll whether the server requires a verification challenge.
    /// Injected ahead of user calls by the challenge guard.
    CheckChallenge = 600,
    /// Submit a solved challenge token.
    VerifyChallenge = 601,

    // -- Diagnostics ---------------------------------------------------------
    /// Round-trip test call.
    Echo = 666,
}

impl RequestType {
    /// The id this call type carries on the wire.
    pub fn wire_id(self) -> u32 {
        self as u32
    }

    /// Looks up a call type by wire id.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for ids not in the
    /// catalog — either a server newer than this client or corruption.
    pub fn from_wire(id: u32) -> Result<Self, ProtocolError> {
        use RequestType::*;
        let ty = match id {
            0 => MethodUnset,
            1 => PlayerUpdate,
            2 => GetPlayer,
            4 => GetInventory,
            5 => DownloadSettings,
            6 => DownloadAssetManifest,
            7 => DownloadRemoteConfig,
            101 => BeaconSearch,
            102 => Encounter,
            103 => Capture,
            104 => BeaconDetails,
            106 => MapScan,
            110 => BeaconDeploy,
            111 => BeaconRecall,
            112 => Release,
            113 => UseHealItem,
            114 => UseCaptureItem,
            116 => UseReviveItem,
            121 => GetPlayerProfile,
            125 => Evolve,
            126 => GetHatchedEggs,
            128 => LevelUpRewards,
            129 => CheckAwardedBadges,
            137 => RecycleItem,
            138 => CollectDailyBonus,
            139 => UseXpBoost,
            140 => UseEggIncubator,
            141 => UseLure,
            148 => SetFavorite,
            149 => Nickname,
            150 => EquipBadge,
            151 => SetContactSettings,
            152 => SetAvatar,
            153 => SetTeam,
            154 => MarkTutorialComplete,
            600 => CheckChallenge,
            601 => VerifyChallenge,
            666 => Echo,
            other => {
                return Err(ProtocolError::InvalidMessage(format!(
                    "unknown request type id {other}"
                )));
            }
        };
        Ok(ty)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.wire_id())
    }
}

// ---------------------------------------------------------------------------
// Intent — why is this dispatch happening?
// ---------------------------------------------------------------------------

/// The coarse purpose of one dispatch cycle.
///
/// A batch usually bundles several calls serving one logical goal. The
/// intent travels with the dispatch and with every delegate
/// notification, so a caller can tell *which* of its activities hit an
/// auth problem without inspecting the batch contents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Intent {
    /// Initial burst after app launch (profile + config + heartbeat).
    AppStart,
    /// Periodic keep-alive bundle (inventory, eggs, badges, settings).
    Heartbeat,
    /// Map-object refresh around the player's position.
    MapRefresh,
    /// A player-initiated action (capture, spin, evolve, ...).
    PlayerAction,
    /// Challenge verification traffic.
    Challenge,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Lowercase keyword form reads better in log lines.
        let name = match self {
            Intent::AppStart => "app-start",
            Intent::Heartbeat => "heartbeat",
            Intent::MapRefresh => "map-refresh",
            Intent::PlayerAction => "player-action",
            Intent::Challenge => "challenge",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Position — where is the player?
// ---------------------------------------------------------------------------

/// The player's reported coordinates and motion context.
///
/// Location-scoped calls copy these fields into their payloads, and the
/// dispatcher includes them in the signed envelope. The defaults for
/// altitude and accuracy are values a real handset plausibly reports;
/// speed, course and floor are only sent when the caller has them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Altitude in meters above sea level.
    pub altitude: f64,
    /// Horizontal accuracy radius in meters.
    pub horizontal_accuracy: f64,
    /// Ground speed in m/s, if known.
    pub speed: Option<f64>,
    /// Heading in degrees clockwise from north, if known.
    pub course: Option<f64>,
    /// Building floor, if known.
    pub floor: Option<u32>,
}

impl Position {
    /// A position at the given coordinates with default motion context.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 6.0,
            horizontal_accuracy: 3.9,
            speed: None,
            course: None,
            floor: None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_id_round_trips_for_catalog_entries() {
        // Spot-check one entry per family rather than a mechanical grid.
        for ty in [
            RequestType::GetPlayer,
            RequestType::MapScan,
            RequestType::LevelUpRewards,
            RequestType::CheckChallenge,
            RequestType::Echo,
        ] {
            assert_eq!(RequestType::from_wire(ty.wire_id()).unwrap(), ty);
        }
    }

    #[test]
    fn test_from_wire_unknown_id_returns_invalid_message() {
        let result = RequestType::from_wire(9999);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_check_challenge_has_reserved_id() {
        // The guard relies on this id being the anti-automation probe.
        assert_eq!(RequestType::CheckChallenge.wire_id(), 600);
    }

    #[test]
    fn test_position_defaults_are_handset_plausible() {
        let pos = Position::at(40.758, -73.985);
        assert_eq!(pos.altitude, 6.0);
        assert_eq!(pos.horizontal_accuracy, 3.9);
        assert!(pos.speed.is_none());
        assert!(pos.floor.is_none());
    }
}
