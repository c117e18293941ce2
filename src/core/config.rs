//! Backdrop configuration
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which rendition of the background to run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Jittered grid of nodes, edges and travelling signals
    #[default]
    Circuit,
    /// Free-roaming particles with proximity lines
    Drift,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Circuit => "circuit",
            Variant::Drift => "drift",
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circuit" | "node" | "nodes" => Ok(Variant::Circuit),
            "drift" | "particle" | "particles" => Ok(Variant::Drift),
            other => Err(ConfigError::Invalid {
                field: "variant",
                reason: format!("unknown variant {other:?}"),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitParams {
    /// Grid cell size
    pub spacing: f32,
    /// Max offset from the cell centre along each axis
    pub jitter: f32,
    /// Probability that a grid cell is left empty
    pub omit_probability: f64,
    /// Max anchor distance for an edge
    pub connect_distance: f32,
    pub max_degree: usize,
    pub active_node_probability: f64,
    pub active_edge_probability: f64,
    /// Pointer radius inside which nodes are pushed away
    pub repel_radius: f32,
    /// Max displacement from the anchor at zero pointer distance
    pub repel_displacement: f32,
    /// Fraction of the residual offset recovered per frame
    pub return_rate: f32,
    /// Pointer radius inside which edges are highlighted
    pub highlight_radius: f32,
    pub signal_spawn_probability: f64,
    /// Chance to accept an inactive edge when spawning a signal
    pub inactive_edge_signal_probability: f64,
    pub max_signals: usize,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self {
            spacing: 80.0,
            jitter: 25.0,
            omit_probability: 0.3,
            connect_distance: 120.0,
            max_degree: 4,
            active_node_probability: 0.3,
            active_edge_probability: 0.4,
            repel_radius: 120.0,
            repel_displacement: 15.0,
            return_rate: 0.05,
            highlight_radius: 150.0,
            signal_spawn_probability: 0.03,
            inactive_edge_signal_probability: 0.2,
            max_signals: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftParams {
    pub max_particles: usize,
    /// One particle per this many units of surface width
    pub width_per_particle: f32,
    /// Max absolute component of the base drift velocity
    pub max_drift_speed: f32,
    pub repel_radius: f32,
    /// Velocity added per frame at zero pointer distance
    pub repel_strength: f32,
    /// Fraction of the velocity offset from the base drift recovered per frame
    pub return_rate: f32,
    pub link_distance: f32,
    /// Line alpha at zero distance
    pub link_alpha: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub hue_min: f32,
    pub hue_max: f32,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            max_particles: 100,
            width_per_particle: 12.0,
            max_drift_speed: 0.25,
            repel_radius: 150.0,
            repel_strength: 0.5,
            return_rate: 0.05,
            link_distance: 120.0,
            link_alpha: 0.15,
            min_size: 1.0,
            max_size: 3.0,
            hue_min: 190.0,
            hue_max: 270.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub variant: Variant,
    /// Fixed RNG seed; `None` seeds from system entropy
    pub seed: Option<u64>,
    /// Draw the fps / entity count overlay
    pub show_stats: bool,
    pub circuit: CircuitParams,
    pub drift: DriftParams,
}

impl BackdropConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.circuit;
        positive("circuit.spacing", c.spacing)?;
        non_negative("circuit.jitter", c.jitter)?;
        positive("circuit.connect_distance", c.connect_distance)?;
        non_negative("circuit.repel_radius", c.repel_radius)?;
        non_negative("circuit.highlight_radius", c.highlight_radius)?;
        unit_interval("circuit.return_rate", c.return_rate as f64)?;
        unit_interval("circuit.omit_probability", c.omit_probability)?;
        unit_interval("circuit.active_node_probability", c.active_node_probability)?;
        unit_interval("circuit.active_edge_probability", c.active_edge_probability)?;
        unit_interval("circuit.signal_spawn_probability", c.signal_spawn_probability)?;
        unit_interval(
            "circuit.inactive_edge_signal_probability",
            c.inactive_edge_signal_probability,
        )?;
        if c.max_degree == 0 {
            return Err(ConfigError::Invalid {
                field: "circuit.max_degree",
                reason: "must be at least 1".into(),
            });
        }

        let d = &self.drift;
        positive("drift.width_per_particle", d.width_per_particle)?;
        non_negative("drift.max_drift_speed", d.max_drift_speed)?;
        non_negative("drift.repel_radius", d.repel_radius)?;
        positive("drift.link_distance", d.link_distance)?;
        unit_interval("drift.return_rate", d.return_rate as f64)?;
        unit_interval("drift.link_alpha", d.link_alpha as f64)?;
        positive("drift.min_size", d.min_size)?;
        if d.max_size < d.min_size {
            return Err(ConfigError::Invalid {
                field: "drift.max_size",
                reason: format!("{} is below min_size {}", d.max_size, d.min_size),
            });
        }
        if d.hue_max < d.hue_min {
            return Err(ConfigError::Invalid {
                field: "drift.hue_max",
                reason: format!("{} is below hue_min {}", d.hue_max, d.hue_min),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be zero or positive"),
        })
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BackdropConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.variant, Variant::Circuit);
        assert_eq!(config.circuit.max_signals, 15);
        assert_eq!(config.circuit.max_degree, 4);
        assert_eq!(config.drift.max_particles, 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            BackdropConfig::from_json(r#"{"variant":"drift","seed":7,"circuit":{"spacing":60}}"#)
                .unwrap();
        assert_eq!(config.variant, Variant::Drift);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.circuit.spacing, 60.0);
        assert_eq!(config.circuit.jitter, 25.0);
        assert!(!config.show_stats);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = BackdropConfig::from_json(r#"{"circuit":{"spacing":0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "circuit.spacing", .. }));

        let err =
            BackdropConfig::from_json(r#"{"circuit":{"signal_spawn_probability":1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = BackdropConfig::from_json(r#"{"circuit":{"max_degree":0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "circuit.max_degree", .. }));

        let err = BackdropConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("Circuit".parse::<Variant>().unwrap(), Variant::Circuit);
        assert_eq!("particles".parse::<Variant>().unwrap(), Variant::Drift);
        assert!("blobs".parse::<Variant>().is_err());
    }
}
