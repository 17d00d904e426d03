use chrono::DateTime;
use chrono::Local;
use std::path::Path;
use std::path::PathBuf;

use crate::registry::Destination;

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) start_time: DateTime<Local>,
    pub(crate) base_name: String,
    pub(crate) filter: Option<String>,
    pub(crate) output_dir: PathBuf,
    pub(crate) passthrough: Destination,
}

impl Default for Config {
    fn default() -> Self {
        Config::new(Local::now())
    }
}

impl Config {
    /// The base name is `fgs<year><month><day>-<hour><minute>` of `start_time`.
    /// ```rust
    /// use chrono::Local;
    /// use chrono::TimeZone;
    /// use fgsniffer::Config;
    ///
    /// let start = Local.with_ymd_and_hms(2024, 1, 15, 14, 23, 59).unwrap();
    /// let config = Config::new(start);
    /// assert_eq!(config.get_base_name(), "fgs20240115-1423");
    /// ```
    pub fn new(start_time: DateTime<Local>) -> Config {
        let base_name = start_time.format("fgs%Y%m%d-%H%M").to_string();
        Config {
            start_time,
            base_name,
            filter: None,
            output_dir: PathBuf::new(),
            passthrough: Destination::Stdout,
        }
    }
    pub fn base_name(&mut self, base_name: &str) {
        self.base_name = base_name.to_string();
    }
    /// An empty token disables pass-through, same as no token.
    pub fn filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|f| !f.is_empty());
    }
    pub fn output_dir<P: AsRef<Path>>(&mut self, output_dir: P) {
        self.output_dir = output_dir.as_ref().to_path_buf();
    }
    pub fn passthrough(&mut self, passthrough: Destination) {
        self.passthrough = passthrough;
    }
    pub fn get_start_time(&self) -> DateTime<Local> {
        self.start_time
    }
    pub fn get_base_name(&self) -> &str {
        &self.base_name
    }
    pub fn get_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn base_name_from_start() {
        let start = Local.with_ymd_and_hms(2023, 11, 2, 9, 5, 0).unwrap();
        let config = Config::new(start);
        assert_eq!(config.get_base_name(), "fgs20231102-0905");
        assert_eq!(config.get_filter(), None);
        assert_eq!(config.passthrough, Destination::Stdout);
    }
    #[test]
    fn empty_filter_is_none() {
        let mut config = Config::default();
        config.filter(Some(String::new()));
        assert_eq!(config.get_filter(), None);
        config.filter(Some(String::from("port1")));
        assert_eq!(config.get_filter(), Some("port1"));
    }
}
