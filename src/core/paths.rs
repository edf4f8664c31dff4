use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base podscribe config directory (universal ~/.config/podscribe/ on all platforms)
pub(crate) fn podscribe() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("podscribe"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("podscribe"))
    }
}

/// Global config.json file path
pub(crate) fn config_json() -> Result<PathBuf> {
    Ok(podscribe()?.join("config.json"))
}
