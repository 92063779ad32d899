use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gridslam_core::{Dimensions, MapRecord};

const TRANSFER_DOMAIN: &str = "gridslam";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded map payload.
pub(crate) const TRANSFER_HEADER: &str = "gridslam:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a map record into a single-line string suitable for copy and paste.
pub(crate) fn encode(record: &MapRecord) -> Result<String, MapTransferError> {
    let json = serde_json::to_vec(record).map_err(MapTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    let dimensions = record.dimensions;
    Ok(format!(
        "{TRANSFER_HEADER}:{}x{}x{}:{encoded}",
        dimensions.width(),
        dimensions.depth(),
        dimensions.levels()
    ))
}

/// Decodes a map record from its transfer string.
///
/// The record is not validated against world invariants; the world does that
/// when the record is loaded.
pub(crate) fn decode(value: &str) -> Result<MapRecord, MapTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MapTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(MapTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(MapTransferError::MissingVersion)?;
    let extents = parts.next().ok_or(MapTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(MapTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(MapTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(MapTransferError::UnsupportedVersion(version.to_owned()));
    }

    let extents = parse_extents(extents)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(MapTransferError::InvalidEncoding)?;
    let record: MapRecord =
        serde_json::from_slice(&bytes).map_err(MapTransferError::InvalidPayload)?;

    let recorded = extents_of(record.dimensions);
    if recorded != extents {
        return Err(MapTransferError::DimensionMismatch {
            header: extents,
            payload: recorded,
        });
    }

    Ok(record)
}

/// Errors that can occur while encoding or decoding map transfer strings.
#[derive(Debug)]
pub(crate) enum MapTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The grid dimensions segment was missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The string used an unexpected prefix.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    InvalidDimensions(String),
    /// The header extents disagree with the record in the payload.
    DimensionMismatch {
        /// Extents written in the header.
        header: (u32, u32, u32),
        /// Extents stored in the record.
        payload: (u32, u32, u32),
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for MapTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer string was empty"),
            Self::MissingPrefix => write!(f, "transfer string is missing the prefix"),
            Self::MissingVersion => write!(f, "transfer string is missing the version"),
            Self::MissingDimensions => {
                write!(f, "transfer string is missing the grid dimensions")
            }
            Self::MissingPayload => write!(f, "transfer string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "map prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "map version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::DimensionMismatch { header, payload } => write!(
                f,
                "header describes a {}x{}x{} grid but the map is {}x{}x{}",
                header.0, header.1, header.2, payload.0, payload.1, payload.2
            ),
            Self::InvalidEncoding(error) => write!(f, "could not decode map payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not process map payload: {error}"),
        }
    }
}

impl Error for MapTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn extents_of(dimensions: Dimensions) -> (u32, u32, u32) {
    (dimensions.width(), dimensions.depth(), dimensions.levels())
}

fn parse_extents(extents: &str) -> Result<(u32, u32, u32), MapTransferError> {
    let invalid = || MapTransferError::InvalidDimensions(extents.to_owned());

    let mut values = extents
        .split(['x', 'X'])
        .map(|value| value.trim().parse::<u32>().map_err(|_| invalid()));
    let width = values.next().ok_or_else(invalid)??;
    let depth = values.next().ok_or_else(invalid)??;
    let levels = values.next().ok_or_else(invalid)??;
    if values.next().is_some() || width == 0 || depth == 0 || levels == 0 {
        return Err(invalid());
    }

    Ok((width, depth, levels))
}
