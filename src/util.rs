use std::fs;
use std::path::{Path, PathBuf};

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Absolute path for log messages; falls back to `path` when it does not exist yet.
pub fn display_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
