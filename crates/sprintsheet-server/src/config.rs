//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use sprintsheet_core::TEAM_STATS_SHEET;

/// Default workbook lock wait
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings for the export service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Workbook file
    pub workbook: PathBuf,
    /// Target sheet name
    pub sheet: String,
    /// Longest a request waits for the workbook lock
    pub lock_timeout: Duration,
}

impl ServerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// With workbook file
    #[inline]
    #[must_use]
    pub fn with_workbook(mut self, path: impl Into<PathBuf>) -> Self {
        self.workbook = path.into();
        self
    }

    /// With target sheet
    #[inline]
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// With lock timeout
    #[inline]
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            workbook: PathBuf::from("team-stats.json"),
            sheet: TEAM_STATS_SHEET.to_string(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}
