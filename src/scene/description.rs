use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{MarionetteError, MarionetteResult};
use crate::physics::motion::Motion;
use crate::rig::opts::RigOpts;

fn default_mass() -> f64 {
    1.0
}

/// One point mass of a rig description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    /// Identifier referenced by constraints.
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Radius used for the ground clamp and pointer hit-testing.
    pub w: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(default, skip_serializing_if = "Motion::is_none")]
    pub motion: Motion,
}

/// One distance constraint of a rig description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDef {
    pub n0: String,
    pub n1: String,
    /// Draw offset of the art relative to `n0`, in simulation units.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Extra draw rotation in radians.
    #[serde(default)]
    pub a: f64,
    /// Key into [`RigDescription::art`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
}

/// Declarative rig structure: nodes, constraints, and raw SVG markup keyed by name.
///
/// Declaration order matters: constraints with art are drawn back-to-front in the order they
/// appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigDescription {
    pub nodes: Vec<NodeDef>,
    pub constraints: Vec<ConstraintDef>,
    #[serde(default)]
    pub art: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opts: Option<RigOpts>,
}

impl RigDescription {
    /// Parse a description from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MarionetteResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MarionetteError::serde(format!("parse rig description JSON: {e}")))
    }

    /// Parse a description from a JSON string.
    pub fn from_json_str(s: &str) -> MarionetteResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| MarionetteError::serde(format!("parse rig description JSON: {e}")))
    }

    /// Parse a description from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MarionetteResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MarionetteError::validation(format!(
                "open rig description '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> MarionetteResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MarionetteError::serde(format!("serialize rig description: {e}")))
    }

    /// Check structural integrity. See [`crate::scene::validate::validate_description`].
    pub fn validate(&self) -> MarionetteResult<()> {
        crate::scene::validate::validate_description(self)
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/description.rs"]
mod tests;
