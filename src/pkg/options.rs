//! Configuration for package containers.
//!
//! A root container owns one `PackageOptions` value and shares it with every
//! container below it.
//!
//! # Examples
//!
//! ```rust
//! use ofd_package::pkg::PackageOptions;
//!
//! let options = PackageOptions::new()
//!     .with_xml_declaration(false)
//!     .with_max_rename_attempts(16);
//! assert!(!options.xml_declaration);
//! ```
use crate::pkg::error::{PackageError, Result};
use serde::{Deserialize, Serialize};

/// Options shared by a container tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    /// Whether structured objects are written with an XML declaration
    pub xml_declaration: bool,
    /// Whether `stage_file` compares content before accepting a file name.
    /// When disabled, a later file silently replaces an earlier one.
    pub dedupe_staged_files: bool,
    /// Upper bound on rename candidates tried for a conflicting file name
    pub max_rename_attempts: u32,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            dedupe_staged_files: true,
            max_rename_attempts: 1000,
        }
    }
}

impl PackageOptions {
    /// Create a new `PackageOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether an XML declaration precedes serialized objects.
    #[inline]
    pub fn with_xml_declaration(mut self, enabled: bool) -> Self {
        self.xml_declaration = enabled;
        self
    }

    /// Set whether staged files are deduplicated by content.
    #[inline]
    pub fn with_dedupe_staged_files(mut self, enabled: bool) -> Self {
        self.dedupe_staged_files = enabled;
        self
    }

    /// Set the rename attempt bound.
    #[inline]
    pub fn with_max_rename_attempts(mut self, attempts: u32) -> Self {
        self.max_rename_attempts = attempts;
        self
    }

    /// Load options from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| PackageError::Options(e.to_string()))
    }

    /// Serialize options to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| PackageError::Options(e.to_string()))
    }
}
