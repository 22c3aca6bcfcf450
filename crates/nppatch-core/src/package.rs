//! Install instructions for a freshly built package version.

use crate::error::NppatchError;

const RULE_WIDTH: usize = 60;
const INSTALL_URL_BASE: &str = "https://login.salesforce.com/packaging/installPackage.apexp?p0=";

/// A package version that can be installed into an org.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallInfo {
    /// Version number, e.g. `1.0.0.1`.
    pub version: String,
    /// Subscriber package version id (`04t...`).
    pub package_id: String,
}

impl InstallInfo {
    pub fn new(version: &str, package_id: &str) -> Result<Self, NppatchError> {
        let version = version.trim();
        let package_id = package_id.trim();
        if version.is_empty() {
            return Err(NppatchError::Config("version number is required".into()));
        }
        if package_id.is_empty() {
            return Err(NppatchError::Config("package version id is required".into()));
        }
        Ok(Self {
            version: version.to_string(),
            package_id: package_id.to_string(),
        })
    }

    /// SF CLI command that installs this version.
    pub fn sf_command(&self) -> String {
        format!(
            "sf package install --package {} --target-org <org-alias> --wait 10",
            self.package_id
        )
    }

    /// Browser install link.
    pub fn install_url(&self) -> String {
        format!("{INSTALL_URL_BASE}{}", self.package_id)
    }

    /// Multi-line banner with both install routes.
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let lines = [
            String::new(),
            rule.clone(),
            "PACKAGE INSTALLATION INFO".to_string(),
            rule.clone(),
            String::new(),
            format!("  Package Version: {}", self.version),
            format!("  Package ID: {}", self.package_id),
            String::new(),
            "  Install via SF CLI:".to_string(),
            format!("    {}", self.sf_command()),
            String::new(),
            "  Install via URL:".to_string(),
            format!("    {}", self.install_url()),
            String::new(),
            rule,
        ];
        lines.join("\n")
    }
}
