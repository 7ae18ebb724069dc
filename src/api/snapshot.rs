use serde::{Deserialize, Serialize};

use crate::core::{Series, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionState, PointEmphasis, SeriesVisibility};

/// Schema version written into every serialized snapshot.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Everything a host needs to redraw a chart or diff it in a regression test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub viewport: Viewport,
    pub x_domain: Vec<String>,
    pub y_domain: (f64, f64),
    pub zoomed_y_domain: (f64, f64),
    pub series: Vec<Series>,
    pub state: InteractionState,
    pub visibility: Vec<SeriesVisibility>,
    #[serde(default)]
    pub points: Vec<PointEmphasis>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    schema_version: u32,
    snapshot: &'a ChartSnapshot,
}

// Read first so a newer payload fails on its version, not on its body.
#[derive(Deserialize)]
struct VersionTag {
    schema_version: u32,
}

#[derive(Deserialize)]
struct OwnedEnvelope {
    snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    /// Pretty JSON wrapped in `{ "schema_version", "snapshot" }`.
    pub fn to_json(&self) -> ChartResult<String> {
        let envelope = Envelope {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            snapshot: self,
        };
        serde_json::to_string_pretty(&envelope)
            .map_err(|e| ChartError::InvalidData(format!("snapshot serialization failed: {e}")))
    }

    /// Parses the output of [`ChartSnapshot::to_json`]. Payloads without a
    /// `schema_version` or with another version are rejected.
    pub fn from_json(input: &str) -> ChartResult<Self> {
        let tag: VersionTag = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("snapshot envelope is malformed: {e}")))?;
        if tag.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(ChartError::InvalidData(format!(
                "snapshot schema version {} is not supported (expected {SNAPSHOT_SCHEMA_VERSION})",
                tag.schema_version
            )));
        }
        let envelope: OwnedEnvelope = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("snapshot body is malformed: {e}")))?;
        Ok(envelope.snapshot)
    }
}
