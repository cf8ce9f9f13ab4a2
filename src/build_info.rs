//! Build information
//!
//! Identifies the liftlog build that produced a set of charts. Shown in the
//! startup banner and recorded in `summary.json` and the PDF summary page.

use serde::Serialize;

/// Build date (UTC), stamped by the build script
pub const BUILD_DATE: &str = match option_env!("LIFTLOG_BUILD_DATE") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub built: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            built: BUILD_DATE,
        }
    }

    /// One-line identifier, e.g. `liftlog 1.0.0 (built 2024-03-01)`
    pub fn label(&self) -> String {
        format!("{} {} (built {})", self.name, self.version, self.built)
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let rule = "=".repeat(47);
    eprintln!("{}", rule);
    eprintln!("  {} - workout log analytics", BuildInfo::current().label());
    eprintln!("{}", rule);
}
