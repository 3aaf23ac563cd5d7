//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// A numeric value that may be left unset. Blank counts as unset; text
    /// that does not parse is reported back as `Err` with the raw value.
    fn get_optional_double(&self, section: &str, key: &str) -> Result<Option<f64>, String>;

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
