//! Hash-password command - prints an argon2 hash for `ADMIN_PASSWORD_HASH`

use std::io::{self, BufRead};

use brochure_auth::hash_password;
use color_eyre::eyre::{Result, WrapErr, eyre};

/// Run the hash-password command.
///
/// Reads the password from the first line of stdin when none is given.
pub fn run(password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => read_password(io::stdin().lock())?,
    };

    let hash = hash_password(&password).wrap_err("Failed to hash password")?;
    println!("{hash}");

    Ok(())
}

fn read_password(input: impl BufRead) -> Result<String> {
    let line = input
        .lines()
        .next()
        .ok_or_else(|| eyre!("No password given on stdin"))?
        .wrap_err("Failed to read password")?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(eyre!("Password must not be empty"));
    }

    Ok(password.to_string())
}
