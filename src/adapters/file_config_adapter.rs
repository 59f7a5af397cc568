//! INI file configuration adapter.

use crate::domain::error::TrendrankError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrendrankError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TrendrankError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TrendrankError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TrendrankError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[data]
dir = ./prices
lookback = 1y

[universe]
instruments = XLK, XLE, GLD
reference = XLK

[reweight]
self_correlation_threshold = 0.95
max_inverse = 50

[report]
show_horizons = yes
"#;

    #[test]
    fn reads_strings() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "dir"), Some("./prices".into()));
        assert_eq!(
            adapter.get_string("universe", "instruments"),
            Some("XLK, XLE, GLD".into())
        );
        assert_eq!(adapter.get_string("universe", "missing"), None);
        assert_eq!(adapter.get_string("nosection", "dir"), None);
    }

    #[test]
    fn reads_numbers_with_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_double("reweight", "self_correlation_threshold", 0.99),
            0.95
        );
        assert_eq!(adapter.get_double("reweight", "max_inverse", 100.0), 50.0);
        assert_eq!(
            adapter.get_double("reweight", "min_correlation_threshold", 0.01),
            0.01
        );
        assert_eq!(adapter.get_double("data", "dir", 7.0), 7.0);
    }

    #[test]
    fn reads_bools() {
        let adapter = FileConfigAdapter::from_string(
            "[report]\na = yes\nb = off\nc = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("report", "a", false));
        assert!(!adapter.get_bool("report", "b", true));
        assert!(adapter.get_bool("report", "c", true));
        assert!(!adapter.get_bool("report", "missing", false));
    }

    #[test]
    fn has_ignores_blank_values() {
        let adapter = FileConfigAdapter::from_string("[data]\ndir =\nlookback = 6mo\n").unwrap();
        assert!(!adapter.has("data", "dir"));
        assert!(adapter.has("data", "lookback"));
        assert!(!adapter.has("data", "missing"));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("universe", "reference"), Some("XLK".into()));
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/trendrank.ini");
        assert!(matches!(result, Err(TrendrankError::ConfigParse { .. })));
    }
}
