//! Print an Argon2id hash for `auth.admin_password_hash`
//!
//! Usage: hash-password <password>

use anyhow::Result;

fn main() -> Result<()> {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("Usage: hash-password <password>");
        std::process::exit(2);
    };

    println!("{}", ontour::services::hash_password(&password)?);
    Ok(())
}
