//! Configuration access port trait.

use crate::domain::error::TinytraderError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `Ok(None)` when the key is absent. Text that is not a number is an
    /// error rather than a silent default.
    fn get_number(&self, section: &str, key: &str) -> Result<Option<f64>, TinytraderError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(None);
        };
        raw.trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| TinytraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{key} must be a number, got {raw:?}"),
            })
    }
}
