use sha2::{Digest, Sha256};

pub const COOKIE_NAME: &str = "hotpuppy_session";
const VISITED: &str = "visited";
const MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Signs the "has visited" marker. The marker only drives the first-visit
/// welcome and never authorizes anything.
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    fn signature(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(value.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn visited_token(&self) -> String {
        format!("{VISITED}.{}", self.signature(VISITED))
    }

    /// True when `cookie` is a marker signed with this secret.
    pub fn is_visited(&self, cookie: Option<&str>) -> bool {
        let Some((value, sig)) = cookie.and_then(|c| c.split_once('.')) else {
            return false;
        };
        value == VISITED && constant_time_eq(sig.as_bytes(), self.signature(value).as_bytes())
    }

    pub fn set_cookie_header(&self) -> String {
        format!(
            "{COOKIE_NAME}={}; Path=/; Max-Age={MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
            self.visited_token()
        )
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let signer = SessionSigner::new("s3cret");
        let token = signer.visited_token();
        assert!(token.starts_with("visited."));
        assert!(signer.is_visited(Some(&token)));
    }

    #[test]
    fn test_foreign_or_tampered_tokens_rejected() {
        let signer = SessionSigner::new("s3cret");
        let other = SessionSigner::new("other").visited_token();

        assert!(!signer.is_visited(None));
        assert!(!signer.is_visited(Some("")));
        assert!(!signer.is_visited(Some("visited")));
        assert!(!signer.is_visited(Some(&other)));

        let forged = signer.visited_token().replacen("visited", "admin", 1);
        assert!(!signer.is_visited(Some(&forged)));
    }

    #[test]
    fn test_cookie_header() {
        let header = SessionSigner::new("s3cret").set_cookie_header();
        assert!(header.starts_with("hotpuppy_session=visited."));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Path=/"));
    }
}
