//! Aheui Configuration
//!
//! Defines execution limits for the driver.
//! Configuration specifies constraints only; enforcement is handled by the machine.

/// Machine configuration
#[derive(Debug, Clone, Default)]
pub struct AheuiConfig {
    /// Maximum number of instructions to execute (`None` means unbounded)
    pub step_limit: Option<u64>,
}

impl AheuiConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of executed instructions
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}
