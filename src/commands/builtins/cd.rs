use crate::errors::{ShellError, ShellResult};
use std::env;
use std::path::{Path, PathBuf};

/// Replace a leading `~` with the home directory, textually: `~/src`
/// becomes `<home>/src` and `~foo` becomes `<home>foo`.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => {
            let mut expanded = home.as_os_str().to_os_string();
            expanded.push(rest);
            PathBuf::from(expanded)
        }
        None => PathBuf::from(path),
    }
}

/// Expand a leading `~` in every word of a stage.
pub fn expand_home_words(stage: &str, home: &Path) -> String {
    stage
        .split(' ')
        .map(|word| {
            if word.starts_with('~') {
                expand_home(word, home).to_string_lossy().into_owned()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Change current working directory; no argument means the home directory.
pub fn change_directory(path: Option<&str>, home: &Path) -> ShellResult<PathBuf> {
    let target = match path {
        Some(p) => expand_home(p, home),
        None => home.to_path_buf(),
    };

    env::set_current_dir(&target).map_err(|source| ShellError::InvalidDirectory {
        path: path.unwrap_or("~").to_string(),
        source,
    })?;
    Ok(target)
}
