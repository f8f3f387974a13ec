use clap::Parser;
use std::path::PathBuf;

/// Shell command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "esh")]
#[command(about = "A small interactive shell", long_about = None)]
pub struct ShellArgs {
    /// Alias file to load and persist to (default: ~/.eshrc)
    #[arg(long, value_name = "PATH")]
    pub alias_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `esh=trace` (default: $ESH_LOG, then `warn`)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = ShellArgs::try_parse_from(["esh", "--alias-file", "/tmp/a.json", "--log-level", "debug"])
            .unwrap();
        assert_eq!(args.alias_file, Some(PathBuf::from("/tmp/a.json")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(ShellArgs::try_parse_from(["esh", "script.sh"]).is_err());
    }
}
