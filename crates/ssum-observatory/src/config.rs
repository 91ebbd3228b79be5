use newton_guards::{Case, ParamError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("case {case:?}: {source}")]
    Invalid { case: String, source: ParamError },
    #[error("config defines no cases")]
    Empty,
}

/// Custom cases loaded from TOML, one `[[case]]` table each.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservatoryConfig {
    #[serde(default, rename = "case")]
    pub cases: Vec<Case>,
}

impl ObservatoryConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ObservatoryConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cases.is_empty() {
            return Err(ConfigError::Empty);
        }
        for case in &self.cases {
            case.validate().map_err(|source| ConfigError::Invalid {
                case: case.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newton_guards::ProblemSpec;
    use ssum_core::{BaselineConvention, UpdateRule};

    const SAMPLE: &str = r#"
[[case]]
name = "sqrt-two"
problem = { kind = "polynomial", coefficients = [1.0, 0.0, -2.0] }
runs = [{ name = "right", x0 = 1.0, a0 = 0.5 }, { name = "left", x0 = -1.0 }]

[case.params]
max_iter = 8

[[case]]
name = "triple"
problem = { kind = "shifted-power", center = 0.5, power = 3 }
runs = [{ name = "only", x0 = 2.0 }]

[case.params]
derivative_eps = 1e-3

[case.params.policy]
baseline = "lagged"

[case.params.policy.rule]
kind = "incremental"
alignment_step = 0.1
contrast_step = 0.05
"#;

    #[test]
    fn parses_cases_with_defaults() {
        let config = ObservatoryConfig::from_toml(SAMPLE, Path::new("sample.toml")).unwrap();
        assert_eq!(config.cases.len(), 2);

        let sqrt = &config.cases[0];
        assert_eq!(sqrt.params.max_iter, 8);
        assert_eq!(sqrt.runs[1].a0, 0.0);
        assert_eq!(
            sqrt.problem,
            ProblemSpec::Polynomial {
                coefficients: vec![1.0, 0.0, -2.0]
            }
        );

        let triple = &config.cases[1];
        assert_eq!(triple.params.max_iter, 12);
        assert_eq!(triple.params.policy.baseline, BaselineConvention::Lagged);
        assert!(matches!(
            triple.params.policy.rule,
            UpdateRule::Incremental { .. }
        ));
    }

    #[test]
    fn rejects_invalid_and_empty_configs() {
        let bad = r#"
[[case]]
name = "broken"
problem = { kind = "polynomial", coefficients = [1.0, -1.0] }
runs = [{ name = "r", x0 = 0.0 }]

[case.params]
eps = -1.0
"#;
        let err = ObservatoryConfig::from_toml(bad, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = ObservatoryConfig::from_toml("", Path::new("empty.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Empty));

        let err = ObservatoryConfig::from_toml("[[case]]\nname = 3", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
