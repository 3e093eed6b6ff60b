use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub message: String,

    /// Captured stdout of the toolchain, relayed unparsed.
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct WitnessParams {
    /// Appended positionally after the fixed public-input list.
    pub unique_ipfs_integer: u64,
}
