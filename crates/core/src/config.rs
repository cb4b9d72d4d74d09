//! Grid configuration loading
//!
//! The configuration file is a flat JSON object with five numeric keys:
//!
//! ```text
//! { "x": <number>, "t": <number>, "X": <number>, "T": <number>, "c": <number> }
//! ```
//!
//! `x`/`t` are the spatial and temporal steps, `X`/`T` the declared extents
//! and `c` the transport speed shown in the plot title. Unknown keys are
//! ignored.

use crate::error::{Location, PlotError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default configuration file name, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Grid spacing, declared extents and the physical parameter
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct GridConfig {
    /// Spatial increment between adjacent columns
    #[serde(rename = "x")]
    pub x_step: f64,
    /// Temporal increment between adjacent rows
    #[serde(rename = "t")]
    pub t_step: f64,
    /// Declared spatial extent
    #[serde(rename = "X")]
    pub x_max: f64,
    /// Declared temporal extent
    #[serde(rename = "T")]
    pub t_max: f64,
    /// Transport speed `c`
    #[serde(rename = "c")]
    pub param: f64,
}

impl GridConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    /// - `FileAccess` if the path does not exist or cannot be read
    /// - `Parse` if the content is not a JSON object or lacks any of the
    ///   keys `x`, `t`, `X`, `T`, `c`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| PlotError::file_access(path, e))?;
        let config = Self::from_json_str(&contents, path)?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse configuration from JSON text
    ///
    /// `origin` only labels errors.
    ///
    /// # Errors
    /// Returns `Parse` with the JSON line number if the text is malformed or
    /// a required key is missing.
    pub fn from_json_str(text: &str, origin: impl AsRef<Path>) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            let location = if e.line() == 0 {
                Location::default()
            } else {
                Location::line(e.line() as u64)
            };
            PlotError::parse(origin, location, e.to_string())
        })
    }

    /// Grid shape implied by the declared extents, as `(t_size, x_size)`
    ///
    /// Each axis holds `ceil(max / step) + 1` samples so that both ends are
    /// included. Returns `None` when the steps or extents are invalid (see
    /// [`GridConfig::has_valid_axes`]) or a sample count does not fit in
    /// `usize`.
    #[must_use]
    pub fn declared_shape(&self) -> Option<(usize, usize)> {
        let t_size = samples(self.t_max, self.t_step)?;
        let x_size = samples(self.x_max, self.x_step)?;
        Some((t_size, x_size))
    }

    /// True when both steps are positive finite numbers and both extents
    /// are finite and non-negative
    #[must_use]
    pub fn has_valid_axes(&self) -> bool {
        valid_axis(self.t_max, self.t_step) && valid_axis(self.x_max, self.x_step)
    }

    /// Title used for the rendered figure
    #[must_use]
    pub fn title(&self) -> String {
        format!("c = {}", self.param)
    }
}

fn valid_axis(extent: f64, step: f64) -> bool {
    step.is_finite() && step > 0.0 && extent.is_finite() && extent >= 0.0
}

fn samples(extent: f64, step: f64) -> Option<usize> {
    if !valid_axis(extent, step) {
        return None;
    }
    // Tiny steps push the ratio past usize (or to infinity)
    let intervals = (extent / step).ceil();
    if intervals >= usize::MAX as f64 {
        return None;
    }
    (intervals as usize).checked_add(1)
}

impl fmt::Display for GridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solving for c = {}; limits: max X = {}, max T = {}; steps: dx = {}, dt = {}",
            self.param, self.x_max, self.t_max, self.x_step, self.t_step
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_config() {
        let config =
            GridConfig::from_json_str(r#"{"x":1,"t":2,"X":5,"T":10,"c":0.7}"#, "config").unwrap();
        assert_eq!(config.x_step, 1.0);
        assert_eq!(config.t_step, 2.0);
        assert_eq!(config.x_max, 5.0);
        assert_eq!(config.t_max, 10.0);
        assert_eq!(config.param, 0.7);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let text = r#"{
            "x": 0.1,
            "t": 0.05,
            "X": 1,
            "T": 2,
            "c": -1.5e-1,
            "comment": "generated"
        }"#;
        let config = GridConfig::from_json_str(text, "config").unwrap();
        assert_eq!(config.param, -0.15);
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let err = GridConfig::from_json_str(r#"{"x":1,"t":2,"X":5,"T":10}"#, "config")
            .unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("`c`"), "{err}");
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let err = GridConfig::from_json_str("{\n\"x\": 1,\n\"t\": oops\n}", "config").unwrap_err();
        match err {
            PlotError::Parse { location, .. } => assert_eq!(location.line, Some(3)),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        let err = GridConfig::from_json_str(r#"{"x":"1","t":2,"X":5,"T":10,"c":1}"#, "config")
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let err = GridConfig::load("/nonexistent/dir/config").unwrap_err();
        assert!(err.is_file_access());
    }

    #[test]
    fn test_declared_shape() {
        let config = GridConfig {
            x_step: 1.0,
            t_step: 2.0,
            x_max: 5.0,
            t_max: 10.0,
            param: 0.7,
        };
        assert_eq!(config.declared_shape(), Some((6, 6)));

        let config = GridConfig {
            x_step: 0.3,
            t_step: 0.25,
            x_max: 1.0,
            t_max: 1.0,
            param: 1.0,
        };
        // ceil(1.0 / 0.3) = 4, ceil(1.0 / 0.25) = 4
        assert_eq!(config.declared_shape(), Some((5, 5)));

        assert_eq!(GridConfig::default().declared_shape(), None);
    }

    #[test]
    fn test_declared_shape_too_large_for_usize() {
        let config = GridConfig {
            x_step: 1e-300,
            t_step: 1.0,
            x_max: 1.0,
            t_max: 1.0,
            param: 0.7,
        };
        assert!(config.has_valid_axes());
        assert_eq!(config.declared_shape(), None);

        let config = GridConfig {
            x_step: 1.0,
            x_max: 1e30,
            ..config
        };
        assert_eq!(config.declared_shape(), None);
    }

    #[test]
    fn test_invalid_axes() {
        assert!(!GridConfig::default().has_valid_axes());
        let config = GridConfig {
            x_step: 1.0,
            t_step: 1.0,
            x_max: -1.0,
            t_max: 1.0,
            param: 0.0,
        };
        assert!(!config.has_valid_axes());
    }

    #[test]
    fn test_parse_is_exact() {
        let config = GridConfig::from_json_str(
            r#"{"x":1.6047802727761426e-13,"t":1.8502574670373677e-10,"X":1,"T":1,"c":10.349801182100315}"#,
            "config",
        )
        .unwrap();
        assert_eq!(config.x_step, 1.6047802727761426e-13);
        assert_eq!(config.t_step, 1.8502574670373677e-10);
        assert_eq!(config.param, 10.349801182100315);
        assert_eq!(config.title(), "c = 10.349801182100315");
    }

    #[test]
    fn test_title() {
        let config = GridConfig {
            param: 0.7,
            ..Default::default()
        };
        assert_eq!(config.title(), "c = 0.7");
    }
}
