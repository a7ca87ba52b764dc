// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration loading for the CLI.

use std::path::Path;

use quill_core::EditorConfig;
use quill_core::error::Result;
use tracing::{info, warn};

/// Load the editor configuration.
///
/// A missing path means defaults. A file that cannot be read or parsed also
/// falls back to defaults with a warning. A file that parses but fails
/// validation is an error, since running with it would break placement.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };

    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config unreadable, using defaults");
            return Ok(EditorConfig::default());
        }
    };
    let config: EditorConfig = match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config is not valid JSON, using defaults");
            return Ok(EditorConfig::default());
        }
    };

    config.validate()?;
    info!(path = %path.display(), "Config loaded");
    Ok(config)
}
