use sha2::{Digest, Sha256};

use crate::config::OperatorCredential;

/// Compares two secrets via their SHA-256 digests so the comparison is
/// fixed-width regardless of input length.
fn digests_match(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}

/// Checks an email/password pair against the provisioned operator roster.
/// Emails match case-insensitively (the roster stores them lowercased);
/// returns the canonical email on success.
pub fn verify(roster: &[OperatorCredential], email: &str, password: &str) -> Option<String> {
    let email = email.trim().to_lowercase();
    roster
        .iter()
        .find(|op| op.email == email && digests_match(&op.password, password))
        .map(|op| op.email.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<OperatorCredential> {
        vec![
            OperatorCredential {
                email: "ana@ops.zone".to_string(),
                password: "hunter2".to_string(),
            },
            OperatorCredential {
                email: "ben@ops.zone".to_string(),
                password: "correct horse".to_string(),
            },
        ]
    }

    #[test]
    fn test_verify_accepts_known_operator() {
        let found = verify(&roster(), "ana@ops.zone", "hunter2");
        assert_eq!(found.as_deref(), Some("ana@ops.zone"));
    }

    #[test]
    fn test_verify_is_email_case_insensitive() {
        let found = verify(&roster(), "  Ana@Ops.Zone ", "hunter2");
        assert_eq!(found.as_deref(), Some("ana@ops.zone"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        assert!(verify(&roster(), "ana@ops.zone", "hunter3").is_none());
    }

    #[test]
    fn test_verify_rejects_unknown_email() {
        assert!(verify(&roster(), "eve@ops.zone", "hunter2").is_none());
    }

    #[test]
    fn test_verify_rejects_crossed_credentials() {
        // Ben's password must not open Ana's account.
        assert!(verify(&roster(), "ana@ops.zone", "correct horse").is_none());
    }
}
