//! Platform-specific directory utilities

use std::path::PathBuf;

/// Get the platform-specific log directory for tozlow
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/tozlow/logs`
/// - Linux: `~/.cache/tozlow/logs` (or `$XDG_CACHE_HOME/tozlow/logs`)
/// - Windows: `%LOCALAPPDATA%\tozlow\cache\logs`
/// - Fallback: `<tmp>/tozlow/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tozlow")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("tozlow"))
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_is_namespaced() {
        let dir = log_dir();
        assert!(dir.ends_with("logs"));
        assert!(dir.to_string_lossy().contains("tozlow"));
    }
}
