use crate::aliases::{AliasStore, Aliases};
use crate::errors::{ShellError, ShellResult};
use std::io::Write;

/// Print every alias as `key -> value`, one per line.
pub fn list<S: AliasStore>(aliases: &Aliases<S>, out: &mut dyn Write) -> ShellResult<()> {
    for (key, value) in aliases.iter() {
        writeln!(out, "{} -> {}", key, value)?;
    }
    out.flush()?;
    Ok(())
}

/// Split `key=value` on the first `=`.
pub fn parse_definition(definition: &str) -> ShellResult<(&str, &str)> {
    let (key, value) = definition
        .split_once('=')
        .ok_or_else(|| ShellError::InvalidAlias("expected key=value".to_string()))?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(ShellError::InvalidAlias(format!("invalid name '{}'", key)));
    }
    Ok((key, value.trim()))
}

pub fn define<S: AliasStore>(aliases: &mut Aliases<S>, definition: &str) -> ShellResult<()> {
    let (key, value) = parse_definition(definition)?;
    aliases.define(key, value)
}
