use std::env;
use std::path::Path;

const BOLD_YELLOW: &str = "\x1b[93m\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Format `user@host:cwd$ ` with the home directory shown as `~`.
pub fn format_prompt(user: &str, host: &str, cwd: &Path, home: &Path) -> String {
    let location = match cwd.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => cwd.display().to_string(),
    };
    format!("{}{}@{}:{}$ {}", BOLD_YELLOW, user, host, location, RESET)
}

/// Prompt for the current process state.
pub fn current_prompt(home: &Path) -> String {
    let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string());
    let cwd = env::current_dir().unwrap_or_else(|_| home.to_path_buf());
    format_prompt(&user, &host, &cwd, home)
}
