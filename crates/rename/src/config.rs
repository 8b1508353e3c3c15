//! Configuration system for the rename core.
//!
//! This module defines the configuration structures used to size the rename core. It provides:
//! 1. **Defaults:** Baseline architectural and physical register file sizes.
//! 2. **Structures:** General (tracing) and register file configuration.
//! 3. **Loading:** JSON parsing from strings or files, followed by validation.
//!
//! Configuration is supplied as JSON (`Config::from_file`) or use `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::common::reg::RegClass;

/// Default configuration constants for the rename core.
mod defaults {
    /// Architectural integer registers.
    pub const INT_ARCH_REGS: usize = 32;

    /// Architectural floating-point registers.
    pub const FLOAT_ARCH_REGS: usize = 32;

    /// Architectural vector element registers.
    pub const VEC_ELEM_ARCH_REGS: usize = 64;

    /// Architectural condition code registers.
    pub const CC_ARCH_REGS: usize = 5;

    /// Physical integer registers.
    pub const INT_PHYS_REGS: usize = 256;

    /// Physical floating-point registers.
    pub const FLOAT_PHYS_REGS: usize = 256;

    /// Physical vector element registers.
    pub const VEC_ELEM_PHYS_REGS: usize = 256;

    /// Physical condition code registers.
    pub const CC_PHYS_REGS: usize = 40;
}

/// Top-level rename configuration.
///
/// # Examples
///
/// ```
/// use o3rename_core::config::Config;
///
/// let json = r#"{ "regs": { "int_phys_regs": 64 } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.regs.int_phys_regs, 64);
/// assert_eq!(config.regs.int_arch_regs, 32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Register file sizes.
    #[serde(default)]
    pub regs: RegFileConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and a sizing error if
    /// validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks register file sizes.
    ///
    /// # Errors
    ///
    /// Fails if any renameable class has no architectural registers or fewer
    /// physical than architectural registers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.regs.validate()
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Emit debug-level rename traces (map dumps, checkpoint lifecycle).
    #[serde(default)]
    pub trace: bool,
}

/// Architectural and physical register counts per class.
///
/// The `Invalid` class is not configurable: it always has one architectural
/// and one physical register.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegFileConfig {
    /// Architectural integer registers.
    #[serde(default = "RegFileConfig::default_int_arch")]
    pub int_arch_regs: usize,

    /// Architectural floating-point registers.
    #[serde(default = "RegFileConfig::default_float_arch")]
    pub float_arch_regs: usize,

    /// Architectural vector element registers.
    #[serde(default = "RegFileConfig::default_vec_elem_arch")]
    pub vec_elem_arch_regs: usize,

    /// Architectural condition code registers.
    #[serde(default = "RegFileConfig::default_cc_arch")]
    pub cc_arch_regs: usize,

    /// Physical integer registers.
    #[serde(default = "RegFileConfig::default_int_phys")]
    pub int_phys_regs: usize,

    /// Physical floating-point registers.
    #[serde(default = "RegFileConfig::default_float_phys")]
    pub float_phys_regs: usize,

    /// Physical vector element registers.
    #[serde(default = "RegFileConfig::default_vec_elem_phys")]
    pub vec_elem_phys_regs: usize,

    /// Physical condition code registers.
    #[serde(default = "RegFileConfig::default_cc_phys")]
    pub cc_phys_regs: usize,
}

impl RegFileConfig {
    /// Architectural register count of `class`.
    pub const fn num_arch_regs(&self, class: RegClass) -> usize {
        match class {
            RegClass::Integer => self.int_arch_regs,
            RegClass::FloatingPoint => self.float_arch_regs,
            RegClass::VectorElement => self.vec_elem_arch_regs,
            RegClass::ConditionCode => self.cc_arch_regs,
            RegClass::Invalid => 1,
        }
    }

    /// Physical register count of `class`.
    pub const fn num_phys_regs(&self, class: RegClass) -> usize {
        match class {
            RegClass::Integer => self.int_phys_regs,
            RegClass::FloatingPoint => self.float_phys_regs,
            RegClass::VectorElement => self.vec_elem_phys_regs,
            RegClass::ConditionCode => self.cc_phys_regs,
            RegClass::Invalid => 1,
        }
    }

    /// Total physical registers across all classes, including the invalid register.
    pub fn total_phys_regs(&self) -> usize {
        RegClass::ALL.iter().map(|&c| self.num_phys_regs(c)).sum()
    }

    /// Checks per-class sizing; see [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns the first sizing error found, in class order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for class in RegClass::RENAMEABLE {
            let arch = self.num_arch_regs(class);
            let phys = self.num_phys_regs(class);
            if arch == 0 {
                return Err(ConfigError::NoArchRegs { class });
            }
            if phys < arch {
                return Err(ConfigError::TooFewPhysRegs { class, arch, phys });
            }
        }
        Ok(())
    }

    /// Returns the default architectural integer register count.
    fn default_int_arch() -> usize {
        defaults::INT_ARCH_REGS
    }

    /// Returns the default architectural floating-point register count.
    fn default_float_arch() -> usize {
        defaults::FLOAT_ARCH_REGS
    }

    /// Returns the default architectural vector element register count.
    fn default_vec_elem_arch() -> usize {
        defaults::VEC_ELEM_ARCH_REGS
    }

    /// Returns the default architectural condition code register count.
    fn default_cc_arch() -> usize {
        defaults::CC_ARCH_REGS
    }

    /// Returns the default physical integer register count.
    fn default_int_phys() -> usize {
        defaults::INT_PHYS_REGS
    }

    /// Returns the default physical floating-point register count.
    fn default_float_phys() -> usize {
        defaults::FLOAT_PHYS_REGS
    }

    /// Returns the default physical vector element register count.
    fn default_vec_elem_phys() -> usize {
        defaults::VEC_ELEM_PHYS_REGS
    }

    /// Returns the default physical condition code register count.
    fn default_cc_phys() -> usize {
        defaults::CC_PHYS_REGS
    }
}

impl Default for RegFileConfig {
    fn default() -> Self {
        Self {
            int_arch_regs: defaults::INT_ARCH_REGS,
            float_arch_regs: defaults::FLOAT_ARCH_REGS,
            vec_elem_arch_regs: defaults::VEC_ELEM_ARCH_REGS,
            cc_arch_regs: defaults::CC_ARCH_REGS,
            int_phys_regs: defaults::INT_PHYS_REGS,
            float_phys_regs: defaults::FLOAT_PHYS_REGS,
            vec_elem_phys_regs: defaults::VEC_ELEM_PHYS_REGS,
            cc_phys_regs: defaults::CC_PHYS_REGS,
        }
    }
}
