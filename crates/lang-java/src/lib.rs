//! Java language profile for the semascope engine.

pub mod profile;

pub use profile::JavaProfile;

use semascope_core::config::EngineConfig;
use semascope_core::model::Module;
use std::sync::Arc;

/// A fresh module using Java conventions.
pub fn java_module(name: &str) -> Module {
    Module::new(name, Arc::new(JavaProfile))
}

pub fn java_module_with_config(name: &str, config: EngineConfig) -> Module {
    Module::with_config(name, Arc::new(JavaProfile), config)
}
