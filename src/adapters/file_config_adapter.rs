//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_optional_double(&self, section: &str, key: &str) -> Result<Option<f64>, String> {
        match self.config.get(section, key) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| raw),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[export]
outfile = bonds.xlsx
only_isins = RU000A1234Z6, SU26238RMFS4

[providers]
moex_base_url = http://localhost:8080
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("export", "outfile"),
            Some("bonds.xlsx".to_string())
        );
        assert_eq!(
            adapter.get_string("providers", "moex_base_url"),
            Some("http://localhost:8080".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[export]\noutfile = a.xlsx\n").unwrap();
        assert_eq!(adapter.get_string("export", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_optional_double_returns_value() {
        let adapter = FileConfigAdapter::from_string("[export]\nmin_ytm = 12.5\n").unwrap();
        assert_eq!(adapter.get_optional_double("export", "min_ytm"), Ok(Some(12.5)));
    }

    #[test]
    fn get_optional_double_unset_is_none() {
        let adapter = FileConfigAdapter::from_string("[export]\nmax_duration =\n").unwrap();
        assert_eq!(adapter.get_optional_double("export", "max_duration"), Ok(None));
        assert_eq!(adapter.get_optional_double("export", "min_ytm"), Ok(None));
    }

    #[test]
    fn get_optional_double_rejects_text() {
        let adapter = FileConfigAdapter::from_string("[export]\nmin_ytm = high\n").unwrap();
        assert_eq!(
            adapter.get_optional_double("export", "min_ytm"),
            Err("high".to_string())
        );
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[export]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("export", "a", false));
        assert!(adapter.get_bool("export", "b", false));
        assert!(adapter.get_bool("export", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[export]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("export", "a", true));
        assert!(!adapter.get_bool("export", "b", true));
        assert!(!adapter.get_bool("export", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[export]\n").unwrap();
        assert!(adapter.get_bool("export", "missing", true));
        assert!(!adapter.get_bool("export", "missing", false));
    }

    #[test]
    fn empty_adapter_has_nothing() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("export", "outfile"), None);
        assert!(!adapter.get_bool("export", "all", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[export]\noutfile = /tmp/out.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("export", "outfile"),
            Some("/tmp/out.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/params.ini");
        assert!(result.is_err());
    }
}
