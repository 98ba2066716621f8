use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Errors raised while resolving the server home directory.
#[derive(Debug, thiserror::Error)]
pub enum HomeDirError {
    #[error("HOME environment variable is not set")]
    HomeMissing,
    #[error("APPDATA environment variable is not set")]
    AppDataMissing,
    #[error("home_dir must be an absolute path (after ~ expansion): {0}")]
    AbsoluteRequired(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    let user_home = || {
        #[cfg(target_os = "windows")]
        let home = env::var("USERPROFILE").or_else(|_| env::var("HOME"));
        #[cfg(not(target_os = "windows"))]
        let home = env::var("HOME");
        home.map_err(|_| HomeDirError::HomeMissing)
    };

    if raw == "~" {
        return Ok(PathBuf::from(user_home()?));
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => Ok(Path::new(&user_home()?).join(rest)),
        None => Ok(PathBuf::from(raw)),
    }
}

/// Resolve the home directory.
///
/// An explicit `config_home` is tilde-expanded and must end up absolute.
/// Otherwise `$HOME/<default_subdir>` (or `%APPDATA%/<default_subdir>` on
/// Windows) is used. With `create` set the directory is created when missing.
pub fn resolve_home_dir(
    config_home: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match config_home {
        Some(raw) => {
            let expanded = expand_tilde(&raw)?;
            if !expanded.is_absolute() {
                return Err(HomeDirError::AbsoluteRequired(raw));
            }
            expanded
        }
        None => platform_base()?.join(default_subdir),
    };

    if create {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

#[cfg(target_os = "windows")]
fn platform_base() -> Result<PathBuf, HomeDirError> {
    env::var("APPDATA")
        .map(PathBuf::from)
        .map_err(|_| HomeDirError::AppDataMissing)
}

#[cfg(not(target_os = "windows"))]
fn platform_base() -> Result<PathBuf, HomeDirError> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| HomeDirError::HomeMissing)
}
