//! Environment projection
//!
//! After freezing, the selected device ids are exported for the external
//! hardware scheduler as one comma-separated variable.

use tracing::info;

use crate::error::Result;
use crate::lifecycle::FrozenConfig;
use crate::tree::ConfigNode;

/// Variable read by the device scheduler.
pub const DEVICE_ENV_VAR: &str = "CUDA_VISIBLE_DEVICES";

/// Leaf holding the device ids.
pub const DEVICE_PATH: &str = "SOLVER.gpu";

/// Device ids joined by commas, e.g. `0,1`.
pub fn device_list(config: &ConfigNode) -> Result<String> {
    Ok(config
        .int_tuple(DEVICE_PATH)?
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(","))
}

/// Export the device list. Only a frozen configuration can be projected.
pub fn project_device_env(config: &FrozenConfig) -> Result<String> {
    let devices = device_list(config)?;
    std::env::set_var(DEVICE_ENV_VAR, &devices);
    info!(event = "config.device_env_set", var = DEVICE_ENV_VAR, devices = %devices);
    Ok(devices)
}
