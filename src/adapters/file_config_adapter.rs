//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
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
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TinytraderError;
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
[backtest]
initial_capital = 10000
start = 2022-01-01 09:30:00

[strategy]
kind = reversal
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "start"),
            Some("2022-01-01 09:30:00".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "kind"),
            Some("reversal".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_capital = 100\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn numbers_are_parsed() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_capital = 10000.5\n").unwrap();
        assert_eq!(
            adapter.get_number("backtest", "initial_capital").unwrap(),
            Some(10000.5)
        );
        assert_eq!(adapter.get_number("backtest", "fee").unwrap(), None);
    }

    #[test]
    fn percent_sign_is_not_a_number() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nfee = 0.5%\n").unwrap();
        match adapter.get_number("backtest", "fee") {
            Err(TinytraderError::ConfigInvalid { section, key, .. }) => {
                assert_eq!(section, "backtest");
                assert_eq!(key, "fee");
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[backtest]\ndata = prices.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "data"),
            Some("prices.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
