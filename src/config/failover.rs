//! Failover procedure configuration

use super::{require_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// How to invoke the external promotion procedure, and how often.
///
/// The command line is assembled as a literal argument vector
/// (`program -i <inventory> <playbook> <extra_args...>`) and is never passed
/// through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Executable to run (looked up on `PATH` when not absolute)
    pub program: String,
    /// Inventory passed with `-i`; omitted when empty
    pub inventory: String,
    /// Playbook path; omitted when empty
    pub playbook: String,
    /// Additional arguments appended verbatim
    pub extra_args: Vec<String>,
    /// Hard wall-clock limit for one invocation
    pub timeout_seconds: u64,
    /// Minimum seconds between successful failovers (0 disables the cooldown)
    pub cooldown_seconds: u64,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            program: "ansible-playbook".to_string(),
            inventory: "/ansible/inventory.yml".to_string(),
            playbook: "/ansible/promote.yml".to_string(),
            extra_args: Vec::new(),
            timeout_seconds: 300,
            cooldown_seconds: 3600,
        }
    }
}

impl FailoverConfig {
    /// Arguments passed to `program`, in order.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3 + self.extra_args.len());
        if !self.inventory.is_empty() {
            args.push("-i".to_string());
            args.push(self.inventory.clone());
        }
        if !self.playbook.is_empty() {
            args.push(self.playbook.clone());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Check that the procedure can be launched with a usable timeout.
    ///
    /// The cooldown may be 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "failover.program".to_string(),
                message: "program cannot be empty".to_string(),
            });
        }
        require_positive("failover.timeout_seconds", self.timeout_seconds)
    }
}
