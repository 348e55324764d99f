// issue_token.rs
// Mints a signed bearer token for a principal, for local testing against the API

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use dotenv::dotenv;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Unix expiry `hours` from now
fn expiry_after_hours(hours: i64) -> anyhow::Result<usize> {
    let valid_for = Duration::try_hours(hours).context("hours-valid is out of range")?;
    let exp = Utc::now()
        .checked_add_signed(valid_for)
        .context("expiry is out of range")?
        .timestamp();
    usize::try_from(exp).context("expiry is before the epoch")
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let mut args = std::env::args().skip(1);
    let Some(principal_id) = args.next().filter(|p| !p.trim().is_empty()) else {
        bail!("usage: issue_token <principal-id> [hours-valid]");
    };
    let hours: i64 = match args.next() {
        Some(raw) => raw.parse().context("hours-valid must be an integer")?,
        None => 24,
    };

    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;

    let token = encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: principal_id,
            exp: expiry_after_hours(hours)?,
        },
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    println!("Authorization: Bearer {}", token);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_after_hours() {
        let now = Utc::now().timestamp() as usize;
        let exp = expiry_after_hours(24).unwrap();
        assert!(exp >= now + 24 * 3600);

        assert!(expiry_after_hours(i64::MAX).is_err());
        assert!(expiry_after_hours(-1_000_000_000).is_err());
    }
}
