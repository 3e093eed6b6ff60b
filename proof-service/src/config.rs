use std::path::PathBuf;

pub struct Config {
    pub addr: String,
    pub zokrates_bin: String,
    pub work_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            addr: std::env::var("PROOF_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            zokrates_bin: std::env::var("ZOKRATES_BIN").unwrap_or_else(|_| "zokrates".to_string()),
            work_dir: std::env::var("ZOKRATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
