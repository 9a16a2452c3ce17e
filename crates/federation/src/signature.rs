//! HTTP `Signature` header parsing.
//!
//! Only the parameters are read here; verifying the signature itself is the
//! job of whatever terminates the signed request.

use url::Url;

/// HTTP signature error.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Missing `keyId` or `signature`.
    #[error("Invalid signature header")]
    InvalidSignatureHeader,
    /// `keyId` is not an absolute URL.
    #[error("Invalid key id: {0}")]
    InvalidKeyId(String),
}

/// Parsed parameters of a draft-cavage `Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureComponents {
    /// URL of the signing key, usually `{actor}#main-key`.
    pub key_id: String,
    pub algorithm: String,
    /// Signed header names, in order.
    pub headers: Vec<String>,
    pub signature: String,
}

impl SignatureComponents {
    /// Parse `keyId="...",algorithm="...",headers="...",signature="..."`.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut key_id = None;
        let mut algorithm = None;
        let mut headers_list = None;
        let mut signature = None;

        for part in header.split(',') {
            if let Some((key, value)) = part.trim().split_once('=') {
                let value = value.trim_matches('"');
                match key {
                    "keyId" => key_id = Some(value.to_string()),
                    "algorithm" => algorithm = Some(value.to_string()),
                    "headers" => headers_list = Some(value.to_string()),
                    "signature" => signature = Some(value.to_string()),
                    _ => {}
                }
            }
        }

        Ok(Self {
            key_id: key_id.ok_or(SignatureError::InvalidSignatureHeader)?,
            algorithm: algorithm.unwrap_or_else(|| "rsa-sha256".to_string()),
            headers: headers_list
                .unwrap_or_else(|| "date".to_string())
                .split(' ')
                .map(String::from)
                .collect(),
            signature: signature.ok_or(SignatureError::InvalidSignatureHeader)?,
        })
    }

    /// Lowercased host of the signing key.
    pub fn key_host(&self) -> Result<String, SignatureError> {
        Url::parse(&self.key_id)
            .ok()
            .and_then(|url| url.host_str().map(str::to_lowercase))
            .ok_or_else(|| SignatureError::InvalidKeyId(self.key_id.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signature_header() {
        let header = r#"keyId="https://Remote.Example/users/bob#main-key",algorithm="rsa-sha256",headers="(request-target) host date",signature="abc=""#;
        let parsed = SignatureComponents::parse(header).unwrap();

        assert_eq!(parsed.key_id, "https://Remote.Example/users/bob#main-key");
        assert_eq!(parsed.headers, ["(request-target)", "host", "date"]);
        assert_eq!(parsed.key_host().unwrap(), "remote.example");
    }

    #[test]
    fn test_parse_requires_key_id() {
        let result = SignatureComponents::parse(r#"algorithm="rsa-sha256",signature="abc""#);
        assert!(matches!(result, Err(SignatureError::InvalidSignatureHeader)));
    }

    #[test]
    fn test_key_host_rejects_relative_key() {
        let parsed = SignatureComponents::parse(r#"keyId="main-key",signature="abc""#).unwrap();
        assert!(parsed.key_host().is_err());
    }
}
