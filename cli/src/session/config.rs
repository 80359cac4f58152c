use anyhow::Context;
use fieldcore::charges::Charge;
use fieldcore::FieldConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Field configuration plus an optional initial charge layout, as read from
/// YAML. Missing sections fall back to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(flatten)]
    pub field: FieldConfig,
    /// Charges placed before any input is replayed. Kept apart from the
    /// `charges` section, which holds the charge radii.
    pub initial_charges: Vec<Charge>,
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading session config {}", path_ref.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing session config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Applies command-line overrides on top of the loaded file.
    pub fn with_overrides(mut self, resolution: Option<usize>, charges: &[Charge]) -> Self {
        if let Some(resolution) = resolution {
            self.field.grid.resolution = resolution;
        }
        self.initial_charges.extend_from_slice(charges);
        self
    }
}

/// Parses a `Q,X,Y` triple as given to `--charge`.
pub fn parse_charge(raw: &str) -> Result<Charge, String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid charge '{raw}': {err}"))?;
    match parts.as_slice() {
        [magnitude, x, y] if parts.iter().all(|v| v.is_finite()) => {
            Ok(Charge::new(*magnitude, *x, *y))
        }
        [_, _, _] => Err(format!("invalid charge '{raw}': values must be finite")),
        _ => Err(format!("invalid charge '{raw}': expected Q,X,Y")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"grid:\n  resolution: 300\ninitial_charges:\n  - { magnitude: 1.0, x: 0.0, y: 0.0 }\n  - { magnitude: -2.0, x: 3.0, y: 1.0 }\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = SessionConfig::load(&path).unwrap();
        assert_eq!(cfg.field.grid.resolution, 300);
        assert_eq!(cfg.field.grid.half_extent, 10.0);
        assert_eq!(cfg.field.equipotentials.levels, 100);
        assert_eq!(cfg.initial_charges.len(), 2);
        assert_eq!(cfg.initial_charges[1], Charge::new(-2.0, 3.0, 1.0));
    }

    #[test]
    fn config_load_sets_charge_radii_alongside_layout() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"charges:\n  exclusion_radius: 0.5\n  hit_radius: 0.6\ninitial_charges:\n  - { magnitude: 1.0, x: 2.0, y: -1.0 }\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = SessionConfig::load(&path).unwrap();
        assert_eq!(cfg.field.charges.exclusion_radius, 0.5);
        assert_eq!(cfg.field.charges.hit_radius, 0.6);
        assert_eq!(cfg.field.charges.marker_radius, 0.2);
        assert_eq!(cfg.initial_charges, vec![Charge::new(1.0, 2.0, -1.0)]);
    }

    #[test]
    fn saved_config_loads_back_unchanged() {
        let mut cfg = SessionConfig::default().with_overrides(Some(240), &[Charge::new(-1.5, 0.5, 4.0)]);
        cfg.field.charges.exclusion_radius = 0.3;
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert_eq!(yaml.matches("charges:").count(), 2);

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(yaml.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        assert_eq!(SessionConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = SessionConfig::load("/nonexistent/session.yaml").unwrap_err();
        assert!(err.to_string().contains("reading session config"));
    }

    #[test]
    fn overrides_replace_resolution_and_append_charges() {
        let cfg = SessionConfig::default()
            .with_overrides(Some(200), &[Charge::new(1.0, 0.0, 0.0)]);
        assert_eq!(cfg.field.grid.resolution, 200);
        assert_eq!(cfg.initial_charges.len(), 1);
    }

    #[test]
    fn parse_charge_accepts_triples_only() {
        assert_eq!(parse_charge("-1, 2, 0.5"), Ok(Charge::new(-1.0, 2.0, 0.5)));
        assert!(parse_charge("1,2").is_err());
        assert!(parse_charge("1,a,2").is_err());
        assert!(parse_charge("inf,0,0").is_err());
    }
}
