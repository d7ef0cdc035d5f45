use std::collections::HashSet;

use crate::foundation::error::{MarionetteError, MarionetteResult};
use crate::scene::description::RigDescription;

/// Reject descriptions the solver cannot run safely.
///
/// Dangling or self-referencing constraint endpoints, duplicate node ids, non-finite
/// coordinates, negative masses or radii, and art keys missing from the art map are all fatal.
pub fn validate_description(desc: &RigDescription) -> MarionetteResult<()> {
    let mut seen = HashSet::with_capacity(desc.nodes.len());
    for (i, n) in desc.nodes.iter().enumerate() {
        if n.id.trim().is_empty() {
            return Err(MarionetteError::validation(format!(
                "nodes[{i}] id must be non-empty"
            )));
        }
        if !seen.insert(n.id.as_str()) {
            return Err(MarionetteError::validation(format!(
                "duplicate node id '{}'",
                n.id
            )));
        }
        if !(n.x.is_finite() && n.y.is_finite()) {
            return Err(MarionetteError::validation(format!(
                "node '{}' position must be finite",
                n.id
            )));
        }
        if !n.w.is_finite() || n.w < 0.0 {
            return Err(MarionetteError::validation(format!(
                "node '{}' radius must be finite and >= 0",
                n.id
            )));
        }
        if !n.mass.is_finite() || n.mass < 0.0 {
            return Err(MarionetteError::validation(format!(
                "node '{}' mass must be finite and >= 0",
                n.id
            )));
        }
        if !n.motion.is_finite() {
            return Err(MarionetteError::validation(format!(
                "node '{}' motion params must be finite",
                n.id
            )));
        }
    }

    for (i, c) in desc.constraints.iter().enumerate() {
        for end in [&c.n0, &c.n1] {
            if !seen.contains(end.as_str()) {
                return Err(MarionetteError::validation(format!(
                    "constraints[{i}] references unknown node '{end}'"
                )));
            }
        }
        if c.n0 == c.n1 {
            return Err(MarionetteError::validation(format!(
                "constraints[{i}] binds node '{}' to itself",
                c.n0
            )));
        }
        if !(c.x.is_finite() && c.y.is_finite() && c.a.is_finite()) {
            return Err(MarionetteError::validation(format!(
                "constraints[{i}] draw offset/rotation must be finite"
            )));
        }
        if let Some(key) = &c.art
            && !desc.art.contains_key(key)
        {
            return Err(MarionetteError::validation(format!(
                "constraints[{i}] references unknown art '{key}'"
            )));
        }
    }

    if let Some(opts) = &desc.opts {
        opts.validate().map_err(MarionetteError::validation)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/validate.rs"]
mod tests;
