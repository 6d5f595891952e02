//! Caller-side builders for the request catalog.
//!
//! Each builder knows one call's payload shape and response type and
//! produces an opaque [`CallDescriptor`] for the batch. This is the
//! only module that knows what the individual calls actually say;
//! everything above it moves descriptors around without looking inside.
//!
//! Builders are free functions over any [`Codec`] so they work with the
//! development JSON codec and a production wire codec alike. Calls that
//! involve randomized gameplay values ([`capture`]) take an injected
//! `Rng` — tests pass a seeded one, production callers use
//! [`capture_random`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use waylink_geo::CellId;
use waylink_protocol::{
    CallDescriptor, Codec, Position, ProtocolError, RequestType,
};
use waylink_session::{DeviceInfo, Session};

use crate::version;

/// Catch-all response for calls whose answer the core doesn't model.
/// Callers that need the real fields decode the raw bytes themselves.
#[derive(Debug, Default, Deserialize)]
pub struct Ack {}

// ---------------------------------------------------------------------------
// Player / account
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GetPlayerPayload<'a> {
    country: &'a str,
    language: &'a str,
}

/// Profile fields the orchestration layer itself consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerResponse {
    pub username: Option<String>,
    pub team: Option<u32>,
    pub banned: Option<bool>,
}

/// Fetch the player's own profile.
pub fn get_player<C: Codec + Clone>(
    codec: &C,
    country: &str,
    language: &str,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, PlayerResponse>(
        codec,
        RequestType::GetPlayer,
        &GetPlayerPayload { country, language },
    )
}

#[derive(Debug, Serialize)]
struct GetInventoryPayload {
    last_timestamp_ms: i64,
    item_been_seen: i32,
}

/// Fetch the inventory. `last_timestamp_ms` of zero means a full
/// snapshot; a previous response's timestamp requests a delta.
pub fn get_inventory<C: Codec + Clone>(
    codec: &C,
    last_timestamp_ms: i64,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::GetInventory,
        &GetInventoryPayload {
            last_timestamp_ms,
            item_been_seen: 0,
        },
    )
}

#[derive(Debug, Serialize)]
struct DownloadSettingsPayload<'a> {
    hash: Option<&'a str>,
}

/// Settings-download response; the caller writes `hash` back onto the
/// session so the next download can be skipped server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsResponse {
    pub hash: Option<String>,
}

/// Download client settings, echoing the session's last settings hash
/// so an unchanged payload comes back empty.
pub fn download_settings<C: Codec + Clone>(
    codec: &C,
    session: &Session,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, SettingsResponse>(
        codec,
        RequestType::DownloadSettings,
        &DownloadSettingsPayload {
            hash: session.settings_hash.as_deref(),
        },
    )
}

#[derive(Debug, Serialize)]
struct DownloadAssetManifestPayload<'a> {
    platform: &'a str,
    app_version: u32,
}

/// Download the asset manifest for this client build.
pub fn download_asset_manifest<C: Codec + Clone>(
    codec: &C,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::DownloadAssetManifest,
        &DownloadAssetManifestPayload {
            platform: version::CLIENT_PLATFORM,
            app_version: version::CLIENT_BUILD,
        },
    )
}

#[derive(Debug, Serialize)]
struct DownloadRemoteConfigPayload<'a> {
    platform: &'a str,
    device_model: Option<&'a str>,
    device_manufacturer: Option<&'a str>,
    app_version: u32,
}

/// Fetch the remote config version for the current build and device.
pub fn download_remote_config<C: Codec + Clone>(
    codec: &C,
    device: &DeviceInfo,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::DownloadRemoteConfig,
        &DownloadRemoteConfigPayload {
            platform: version::CLIENT_PLATFORM,
            device_model: device.model.as_deref(),
            device_manufacturer: device.hardware_manufacturer.as_deref(),
            app_version: version::CLIENT_BUILD,
        },
    )
}

#[derive(Debug, Serialize)]
struct PlayerUpdatePayload {
    latitude: f64,
    longitude: f64,
}

/// Report the player's coordinates.
pub fn player_update<C: Codec + Clone>(
    codec: &C,
    position: &Position,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::PlayerUpdate,
        &PlayerUpdatePayload {
            latitude: position.latitude,
            longitude: position.longitude,
        },
    )
}

// ---------------------------------------------------------------------------
// Map & world interaction
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MapScanPayload {
    cell_ids: Vec<CellId>,
    since_timestamp_ms: Vec<i64>,
    latitude: f64,
    longitude: f64,
}

/// Query map objects around the player.
///
/// When `cells` is `None`, the cover is computed from the position via
/// [`waylink_geo::cover`]. `since_timestamp_ms` is zero-filled to one
/// entry per cell (full snapshot); pass previous-response timestamps
/// for deltas.
pub fn map_scan<C: Codec + Clone>(
    codec: &C,
    position: &Position,
    cells: Option<Vec<CellId>>,
    since_timestamp_ms: Option<Vec<i64>>,
) -> Result<CallDescriptor, ProtocolError> {
    let cell_ids = cells.unwrap_or_else(|| {
        waylink_geo::cover(position.latitude, position.longitude)
    });
    let since_timestamp_ms =
        since_timestamp_ms.unwrap_or_else(|| vec![0; cell_ids.len()]);
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::MapScan,
        &MapScanPayload {
            cell_ids,
            since_timestamp_ms,
            latitude: position.latitude,
            longitude: position.longitude,
        },
    )
}

#[derive(Debug, Serialize)]
struct BeaconPayload<'a> {
    beacon_id: &'a str,
    beacon_latitude: f64,
    beacon_longitude: f64,
    player_latitude: f64,
    player_longitude: f64,
}

/// Spin a beacon for items.
pub fn beacon_search<C: Codec + Clone>(
    codec: &C,
    beacon_id: &str,
    beacon_latitude: f64,
    beacon_longitude: f64,
    position: &Position,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::BeaconSearch,
        &BeaconPayload {
            beacon_id,
            beacon_latitude,
            beacon_longitude,
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        },
    )
}

/// Fetch one beacon's details.
pub fn beacon_details<C: Codec + Clone>(
    codec: &C,
    beacon_id: &str,
    beacon_latitude: f64,
    beacon_longitude: f64,
    position: &Position,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::BeaconDetails,
        &BeaconPayload {
            beacon_id,
            beacon_latitude,
            beacon_longitude,
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        },
    )
}

#[derive(Debug, Serialize)]
struct BeaconCreaturePayload<'a> {
    beacon_id: &'a str,
    creature_id: u64,
    player_latitude: f64,
    player_longitude: f64,
}

/// Station a creature at a beacon.
pub fn beacon_deploy<C: Codec + Clone>(
    codec: &C,
    beacon_id: &str,
    creature_id: u64,
    position: &Position,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::BeaconDeploy,
        &BeaconCreaturePayload {
            beacon_id,
            creature_id,
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        },
    )
}

/// Recall a stationed creature.
pub fn beacon_recall<C: Codec + Clone>(
    codec: &C,
    beacon_id: &str,
    creature_id: u64,
    position: &Position,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::BeaconRecall,
        &BeaconCreaturePayload {
            beacon_id,
            creature_id,
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        },
    )
}

#[derive(Debug, Serialize)]
struct EncounterPayload<'a> {
    encounter_id: u64,
    spawn_ref: &'a str,
    player_latitude: f64,
    player_longitude: f64,
}

/// Start an encounter with a wild creature.
pub fn encounter<C: Codec + Clone>(
    codec: &C,
    encounter_id: u64,
    spawn_ref: &str,
    position: &Position,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::Encounter,
        &EncounterPayload {
            encounter_id,
            spawn_ref,
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        },
    )
}

// -- Capture ----------------------------------------------------------------

/// Optional throw parameters for [`capture`].
///
/// Unset fields are filled with randomized human-plausible values at
/// build time: a perfect throw every time is a bot signature. The
/// randomization ranges match what a well-aimed human throw produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureOptions {
    /// Whether the throw hit. Defaults to `true`.
    pub hit: Option<bool>,
    /// Normalized targeting-reticle size. Defaults to `1.95 + [0, 0.05)`.
    pub reticle_size: Option<f64>,
    /// Normalized hit position. Defaults to `1.0` (dead center).
    pub hit_position: Option<f64>,
    /// Throw-spin modifier. Defaults to `0.85 + [0, 0.15)`.
    pub spin_modifier: Option<f64>,
}

impl CaptureOptions {
    /// Fills every unset field from the rng.
    fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> ResolvedCapture {
        ResolvedCapture {
            hit: self.hit.unwrap_or(true),
            reticle_size: self
                .reticle_size
                .unwrap_or_else(|| 1.95 + rng.random_range(0.0..0.05)),
            hit_position: self.hit_position.unwrap_or(1.0),
            spin_modifier: self
                .spin_modifier
                .unwrap_or_else(|| 0.85 + rng.random_range(0.0..0.15)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedCapture {
    hit: bool,
    reticle_size: f64,
    hit_position: f64,
    spin_modifier: f64,
}

#[derive(Debug, Serialize)]
struct CapturePayload<'a> {
    encounter_id: u64,
    spawn_ref: &'a str,
    item_id: u32,
    hit: bool,
    normalized_reticle_size: f64,
    normalized_hit_position: f64,
    spin_modifier: f64,
}

/// Capture-attempt outcome, for downcasting.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureResponse {
    pub status: Option<u32>,
    pub captured_creature_id: Option<u64>,
}

/// Throw at an encountered creature, drawing unset throw parameters
/// from the given rng.
pub fn capture<C, R>(
    codec: &C,
    encounter_id: u64,
    spawn_ref: &str,
    item_id: u32,
    options: CaptureOptions,
    rng: &mut R,
) -> Result<CallDescriptor, ProtocolError>
where
    C: Codec + Clone,
    R: Rng + ?Sized,
{
    let throw = options.resolve(rng);
    CallDescriptor::build::<_, _, CaptureResponse>(
        codec,
        RequestType::Capture,
        &CapturePayload {
            encounter_id,
            spawn_ref,
            item_id,
            hit: throw.hit,
            normalized_reticle_size: throw.reticle_size,
            normalized_hit_position: throw.hit_position,
            spin_modifier: throw.spin_modifier,
        },
    )
}

/// [`capture`] with the thread-local rng.
pub fn capture_random<C: Codec + Clone>(
    codec: &C,
    encounter_id: u64,
    spawn_ref: &str,
    item_id: u32,
    options: CaptureOptions,
) -> Result<CallDescriptor, ProtocolError> {
    capture(codec, encounter_id, spawn_ref, item_id, options, &mut rand::rng())
}

// ---------------------------------------------------------------------------
// Collection management
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CreaturePayload {
    creature_id: u64,
}

/// Release a creature from the collection.
pub fn release<C: Codec + Clone>(
    codec: &C,
    creature_id: u64,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::Release,
        &CreaturePayload { creature_id },
    )
}

/// Evolve a creature.
pub fn evolve<C: Codec + Clone>(
    codec: &C,
    creature_id: u64,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::Evolve,
        &CreaturePayload { creature_id },
    )
}

#[derive(Debug, Serialize)]
struct ItemOnCreaturePayload {
    item_id: u32,
    creature_id: u64,
}

/// Apply a healing item to a creature.
pub fn use_heal_item<C: Codec + Clone>(
    codec: &C,
    item_id: u32,
    creature_id: u64,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::UseHealItem,
        &ItemOnCreaturePayload { item_id, creature_id },
    )
}

/// Revive a fainted creature.
pub fn use_revive_item<C: Codec + Clone>(
    codec: &C,
    item_id: u32,
    creature_id: u64,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::UseReviveItem,
        &ItemOnCreaturePayload { item_id, creature_id },
    )
}

#[derive(Debug, Serialize)]
struct UseCaptureItemPayload<'a> {
    item_id: u32,
    encounter_id: u64,
    spawn_ref: &'a str,
}

/// Use a capture-assist item mid-encounter.
pub fn use_capture_item<C: Codec + Clone>(
    codec: &C,
    item_id: u32,
    encounter_id: u64,
    spawn_ref: &str,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::UseCaptureItem,
        &UseCaptureItemPayload {
            item_id,
            encounter_id,
            spawn_ref,
        },
    )
}

#[derive(Debug, Serialize)]
struct RecycleItemPayload {
    item_id: u32,
    count: i32,
}

/// Recycle inventory items for space.
pub fn recycle_item<C: Codec + Clone>(
    codec: &C,
    item_id: u32,
    count: i32,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::RecycleItem,
        &RecycleItemPayload { item_id, count },
    )
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EmptyPayload {}

/// Collect any eggs that hatched since the last check.
pub fn get_hatched_eggs<C: Codec + Clone>(
    codec: &C,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::GetHatchedEggs,
        &EmptyPayload {},
    )
}

/// Check for badges awarded since the last check.
pub fn check_awarded_badges<C: Codec + Clone>(
    codec: &C,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::CheckAwardedBadges,
        &EmptyPayload {},
    )
}

/// Collect the daily login bonus.
pub fn collect_daily_bonus<C: Codec + Clone>(
    codec: &C,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::CollectDailyBonus,
        &EmptyPayload {},
    )
}

#[derive(Debug, Serialize)]
struct LevelUpRewardsPayload {
    level: i32,
}

/// Claim the rewards for a newly reached level.
pub fn level_up_rewards<C: Codec + Clone>(
    codec: &C,
    level: i32,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::LevelUpRewards,
        &LevelUpRewardsPayload { level },
    )
}

// ---------------------------------------------------------------------------
// Anti-automation & diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct VerifyChallengePayload<'a> {
    token: &'a str,
}

/// Whether the solved challenge was accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyChallengeResponse {
    pub success: bool,
}

/// Submit a solved challenge token.
pub fn verify_challenge<C: Codec + Clone>(
    codec: &C,
    token: &str,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, VerifyChallengeResponse>(
        codec,
        RequestType::VerifyChallenge,
        &VerifyChallengePayload { token },
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct EchoPayload {}

/// Round-trip test call.
pub fn echo<C: Codec + Clone>(
    codec: &C,
) -> Result<CallDescriptor, ProtocolError> {
    CallDescriptor::build::<_, _, Ack>(
        codec,
        RequestType::Echo,
        &EchoPayload {},
    )
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use waylink_protocol::JsonCodec;

    #[test]
    fn test_map_scan_autofills_cover_and_zero_timestamps() {
        let position = Position::at(40.758, -73.985);
        let desc =
            map_scan(&JsonCodec, &position, None, None).unwrap();
        assert_eq!(desc.request_type, RequestType::MapScan);

        let payload: serde_json::Value =
            serde_json::from_slice(&desc.payload).unwrap();
        let cells = payload["cell_ids"].as_array().unwrap();
        let stamps = payload["since_timestamp_ms"].as_array().unwrap();
        assert!(!cells.is_empty());
        assert_eq!(cells.len(), stamps.len());
        assert!(stamps.iter().all(|s| s.as_i64() == Some(0)));
    }

    #[test]
    fn test_map_scan_explicit_cells_are_respected() {
        let position = Position::at(0.0, 0.0);
        let cells = waylink_geo::cover(51.5, -0.12);
        let desc = map_scan(&JsonCodec, &position, Some(cells.clone()), None)
            .unwrap();

        let payload: serde_json::Value =
            serde_json::from_slice(&desc.payload).unwrap();
        assert_eq!(
            payload["cell_ids"].as_array().unwrap().len(),
            cells.len()
        );
    }

    #[test]
    fn test_capture_defaults_are_randomized_within_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            let desc = capture(
                &JsonCodec,
                7,
                "spawn-a",
                1,
                CaptureOptions::default(),
                &mut rng,
            )
            .unwrap();
            let payload: serde_json::Value =
                serde_json::from_slice(&desc.payload).unwrap();

            let reticle =
                payload["normalized_reticle_size"].as_f64().unwrap();
            let spin = payload["spin_modifier"].as_f64().unwrap();
            assert!((1.95..2.0).contains(&reticle));
            assert!((0.85..1.0).contains(&spin));
            assert_eq!(payload["hit"], serde_json::Value::Bool(true));
            assert_eq!(
                payload["normalized_hit_position"].as_f64(),
                Some(1.0)
            );
        }
    }

    #[test]
    fn test_capture_explicit_options_bypass_rng() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = CaptureOptions {
            hit: Some(false),
            reticle_size: Some(1.97),
            hit_position: Some(0.5),
            spin_modifier: Some(0.9),
        };
        let desc =
            capture(&JsonCodec, 7, "spawn-a", 1, options, &mut rng).unwrap();
        let payload: serde_json::Value =
            serde_json::from_slice(&desc.payload).unwrap();

        assert_eq!(payload["hit"], serde_json::Value::Bool(false));
        assert_eq!(
            payload["normalized_reticle_size"].as_f64(),
            Some(1.97)
        );
        assert_eq!(payload["normalized_hit_position"].as_f64(), Some(0.5));
        assert_eq!(payload["spin_modifier"].as_f64(), Some(0.9));
    }

    #[test]
    fn test_download_settings_threads_session_hash() {
        let mut session = Session::generate(&mut StdRng::seed_from_u64(1), 0);
        session.settings_hash = Some("abc123".into());

        let desc = download_settings(&JsonCodec, &session).unwrap();
        let payload: serde_json::Value =
            serde_json::from_slice(&desc.payload).unwrap();

        assert_eq!(payload["hash"].as_str(), Some("abc123"));
    }

    #[test]
    fn test_builders_set_expected_request_types() {
        let position = Position::at(1.0, 2.0);
        let cases = vec![
            (
                get_player(&JsonCodec, "US", "en").unwrap(),
                RequestType::GetPlayer,
            ),
            (
                get_inventory(&JsonCodec, 0).unwrap(),
                RequestType::GetInventory,
            ),
            (
                player_update(&JsonCodec, &position).unwrap(),
                RequestType::PlayerUpdate,
            ),
            (
                beacon_search(&JsonCodec, "b-1", 1.0, 2.0, &position)
                    .unwrap(),
                RequestType::BeaconSearch,
            ),
            (
                encounter(&JsonCodec, 1, "s", &position).unwrap(),
                RequestType::Encounter,
            ),
            (release(&JsonCodec, 1).unwrap(), RequestType::Release),
            (
                verify_challenge(&JsonCodec, "tok").unwrap(),
                RequestType::VerifyChallenge,
            ),
            (echo(&JsonCodec).unwrap(), RequestType::Echo),
        ];
        for (desc, expected) in cases {
            assert_eq!(desc.request_type, expected);
        }
    }
}
