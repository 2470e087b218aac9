//! Configuration text helpers.

use crate::{Error, Result};

/// Substitute every `${VAR}` in `input` with the value of the environment
/// variable `VAR`.
///
/// An undefined variable or an unterminated `${` is a configuration error.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            Error::Config(format!(
                "unterminated `${{` in configuration near `{}`",
                &rest[start..].lines().next().unwrap_or_default()
            ))
        })?;

        let name = &after[..end];
        let value = std::env::var(name).map_err(|_| {
            Error::Config(format!("environment variable `{name}` is not set"))
        })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
