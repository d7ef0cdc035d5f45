use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{MarionetteError, MarionetteResult};

/// Parse SVG markup into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> MarionetteResult<Arc<usvg::Tree>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| MarionetteError::decode(format!("{e:#}")))?;
    Ok(Arc::new(tree))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
