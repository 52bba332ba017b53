use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub emailbison_base_url: String,
    pub emailbison_api_key: String,
    pub hq_base_url: String,
    pub hq_api_key: String,
    pub modal_base_url: String,
    pub modal_api_key: String,
    /// Provisioned operator accounts. This is an internal tool: operators are
    /// listed in the environment, there is no signup flow.
    pub operators: Vec<OperatorCredential>,
    pub session_ttl_hours: i64,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct OperatorCredential {
    /// Stored lowercased; login is case-insensitive on email.
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            emailbison_base_url: require_env("EMAILBISON_BASE_URL")?,
            emailbison_api_key: require_env("EMAILBISON_API_KEY")?,
            hq_base_url: require_env("HQ_BASE_URL")?,
            hq_api_key: require_env("HQ_API_KEY")?,
            modal_base_url: require_env("MODAL_BASE_URL")?,
            modal_api_key: require_env("MODAL_API_KEY")?,
            operators: parse_operators(&require_env("OPS_OPERATORS")?)?,
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse::<i64>()
                .context("SESSION_TTL_HOURS must be a number of hours")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses `OPS_OPERATORS`: comma-separated `email:password` pairs.
fn parse_operators(raw: &str) -> Result<Vec<OperatorCredential>> {
    let mut operators = Vec::new();

    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((email, password)) = pair.split_once(':') else {
            bail!("OPS_OPERATORS entry '{pair}' is not in email:password form");
        };
        if email.is_empty() || password.is_empty() {
            bail!("OPS_OPERATORS entry '{pair}' has an empty email or password");
        }
        operators.push(OperatorCredential {
            email: email.to_lowercase(),
            password: password.to_string(),
        });
    }

    if operators.is_empty() {
        bail!("OPS_OPERATORS must list at least one operator");
    }

    Ok(operators)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_operator() {
        let ops = parse_operators("alice@corp.com:hunter2").unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].email, "alice@corp.com");
        assert_eq!(ops[0].password, "hunter2");
    }

    #[test]
    fn test_parse_multiple_operators_with_whitespace() {
        let ops = parse_operators("alice@corp.com:a, bob@corp.com:b").unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].email, "bob@corp.com");
    }

    #[test]
    fn test_email_is_lowercased() {
        let ops = parse_operators("Alice@Corp.COM:a").unwrap();
        assert_eq!(ops[0].email, "alice@corp.com");
    }

    #[test]
    fn test_password_may_contain_colon() {
        let ops = parse_operators("alice@corp.com:pa:ss").unwrap();
        assert_eq!(ops[0].password, "pa:ss");
    }

    #[test]
    fn test_rejects_entry_without_colon() {
        assert!(parse_operators("alice@corp.com").is_err());
    }

    #[test]
    fn test_rejects_empty_directory() {
        assert!(parse_operators("").is_err());
        assert!(parse_operators(" , ").is_err());
    }
}
