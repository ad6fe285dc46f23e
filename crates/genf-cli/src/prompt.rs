//! Terminal prompts. Passwords are read without echo.

use anyhow::{Context, Result};
use genf_crypto::Password;
use std::io::{self, BufRead, Write};

pub fn password(prompt: &str) -> Result<Password> {
    let entered = rpassword::prompt_password(prompt).context("reading password")?;
    Ok(Password::from(entered))
}

/// Print `prompt` and read one line from stdin. `None` at end of input.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush().context("flushing stdout")?;
    read_line_from(&mut io::stdin().lock())
}

fn read_line_from<R: BufRead>(r: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let n = r.read_line(&mut line).context("reading stdin")?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// `y` proceeds; anything else (including end of input) cancels.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(is_yes(read_line(prompt)?.as_deref()))
}

fn is_yes(answer: Option<&str>) -> bool {
    matches!(answer.map(str::trim), Some("y" | "Y"))
}
