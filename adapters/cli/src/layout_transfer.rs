use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use snake_hunt_core::{ArenaLayout, Cell, ConfigError, GridBounds};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "arena";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const SNAPSHOT_HEADER: &str = "arena:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes an arena layout into a single-line string suitable for sharing.
pub(crate) fn encode(layout: &ArenaLayout) -> Result<String, LayoutTransferError> {
    let bounds = layout.bounds;
    let payload = SerializableLayout {
        min_x: bounds.min_x(),
        min_y: bounds.min_y(),
        walls: layout.walls.clone(),
        player_spawn: layout.player_spawn,
        opponent_spawn: layout.opponent_spawn,
    };
    let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
        bounds.width(),
        bounds.height()
    ))
}

/// Decodes an arena layout from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<ArenaLayout, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let decoded: SerializableLayout =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    let max_x = extend(decoded.min_x, width).ok_or_else(|| oversized(dimensions))?;
    let max_y = extend(decoded.min_y, height).ok_or_else(|| oversized(dimensions))?;
    let bounds = GridBounds::new(decoded.min_x, max_x, decoded.min_y, max_y)?;

    Ok(ArenaLayout {
        bounds,
        walls: decoded.walls,
        player_spawn: decoded.player_spawn,
        opponent_spawn: decoded.opponent_spawn,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    min_x: i32,
    min_y: i32,
    walls: Vec<Cell>,
    player_spawn: Cell,
    opponent_spawn: Cell,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The JSON payload could not be produced or parsed.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The decoded bounds do not describe a usable arena.
    #[error("layout bounds are invalid: {0}")]
    InvalidBounds(#[from] ConfigError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());

    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

/// Exclusive upper bound `span` cells past `min`, if it fits in an `i32`.
fn extend(min: i32, span: u32) -> Option<i32> {
    i32::try_from(i64::from(min) + i64::from(span)).ok()
}

fn oversized(dimensions: &str) -> LayoutTransferError {
    LayoutTransferError::InvalidDimensions(dimensions.to_owned())
}
