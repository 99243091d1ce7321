//! Mesher configuration.
//!
//! Loaded once at startup from TOML:
//!
//! ```toml
//! mesher = "greedy"
//! center_on_bbox = true
//! slow_mesh_warn_ms = 10
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// Which meshing strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MesherKind {
    /// One quad per visible voxel face.
    Simple,
    /// Merge coplanar faces into maximal rectangles.
    #[default]
    Greedy,
}

impl MesherKind {
    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MesherKind::Simple => "simple",
            MesherKind::Greedy => "greedy",
        }
    }
}

impl fmt::Display for MesherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MesherKind {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(MesherKind::Simple),
            "greedy" => Ok(MesherKind::Greedy),
            other => Err(MeshError::InvalidConfig(format!(
                "unknown mesher '{other}', expected 'simple' or 'greedy'"
            ))),
        }
    }
}

/// Settings shared by all meshers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Strategy selected by [`crate::Mesher::from_config`].
    pub mesher: MesherKind,
    /// Centre output on the grid bounding box. When false, voxel `p`
    /// spans `[p, p + 1]` on each axis.
    pub center_on_bbox: bool,
    /// Generation slower than this is logged as a warning.
    pub slow_mesh_warn_ms: u64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            mesher: MesherKind::default(),
            center_on_bbox: true,
            slow_mesh_warn_ms: 10,
        }
    }
}

impl MeshConfig {
    /// Config with the given strategy and default settings.
    #[must_use]
    pub fn with_mesher(mesher: MesherKind) -> Self {
        Self {
            mesher,
            ..Self::default()
        }
    }

    /// Parses a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> MeshResult<Self> {
        toml::from_str(text).map_err(|e| MeshError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::ConfigIo`] if the file cannot be read, or
    /// [`MeshError::InvalidConfig`] if it does not parse.
    pub fn from_toml_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MeshError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> MeshResult<String> {
        toml::to_string(self).map_err(|e| MeshError::InvalidConfig(e.to_string()))
    }
}
