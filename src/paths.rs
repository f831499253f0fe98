//! Path utilities and file system helpers

use std::path::PathBuf;

/// Gets the application configuration directory
pub fn get_config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|p| p.join("hecho-por-mi"))
        .ok_or_else(|| "Could not find config directory".to_string())
}

/// Gets the configuration file path
pub fn get_config_path() -> Result<PathBuf, String> {
    get_config_dir().map(|p| p.join("config.json"))
}

/// Gets the directory where exported guides are written
pub fn get_export_dir() -> Result<PathBuf, String> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| "Could not find a downloads directory".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_under_app_dir() {
        if let Ok(path) = get_config_path() {
            assert!(path.ends_with("hecho-por-mi/config.json") || path.ends_with("config.json"));
            assert!(path.to_string_lossy().contains("hecho-por-mi"));
        }
    }
}
