use crate::errors::ApiError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Fixed public inputs baked into the deployed circuit.
///
/// The caller's IPFS integer is appended as the final witness argument.
pub const PUBLIC_INPUTS: [u64; 10] = [1, 2, 3, 4, 2_218_678_120, 5, 6, 7, 8, 9];

/// Circuit source file the compile step reads from the working directory.
pub const CIRCUIT_SOURCE: &str = "root.zok";

/// Captured result of one toolchain invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Seam over the external toolchain so handlers can be exercised without a
/// real ZoKrates install.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<ToolOutput, ApiError>;
}

/// Runs the configured `zokrates` binary in its working directory.
///
/// All persisted artifacts (compiled circuit, proving/verification keys,
/// witness, proof) live in that directory and are owned entirely by the
/// toolchain; this service never inspects them.
pub struct ZokratesInvoker {
    bin: String,
    work_dir: PathBuf,
}

impl ZokratesInvoker {
    pub fn new(bin: String, work_dir: PathBuf) -> Self {
        Self { bin, work_dir }
    }
}

#[async_trait]
impl ToolInvoker for ZokratesInvoker {
    async fn run(&self, args: &[String]) -> Result<ToolOutput, ApiError> {
        tracing::debug!(bin = %self.bin, ?args, "invoking toolchain");

        let output = Command::new(&self.bin)
            .args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ApiError::Spawn(format!("{}: {e}", self.bin)))?;

        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Argument list for `compute-witness`: the fixed public inputs followed by
/// the caller's integer, in order.
pub fn witness_args(unique_ipfs_integer: u64) -> Vec<String> {
    let mut args = vec!["compute-witness".to_string(), "-a".to_string()];
    args.extend(PUBLIC_INPUTS.iter().map(|v| v.to_string()));
    args.push(unique_ipfs_integer.to_string());
    args
}
