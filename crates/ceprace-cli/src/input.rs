use std::io::{BufRead, Write};

use ceprace_core::LookupKey;

use crate::error::CliError;

const PROMPT: &str = "Enter the postal code (digits only): ";

/// Uses the positional argument when given, otherwise prompts for one line.
pub fn resolve_key<R, W>(
    arg: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<LookupKey, CliError>
where
    R: BufRead,
    W: Write,
{
    if let Some(raw) = arg {
        return Ok(LookupKey::parse(raw)?);
    }

    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::Input(String::from(
            "no postal code provided on stdin",
        )));
    }

    Ok(LookupKey::parse(&line)?)
}
