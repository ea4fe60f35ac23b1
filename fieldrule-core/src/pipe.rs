// Decode-then-verify pipe for request parameters

use crate::{Verify, VerifyError};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Response code for parameters that could not be decoded.
pub const CODE_DECODE: u16 = 4001;
/// Response code for parameters that broke a rule.
pub const CODE_INVALID: u16 = 4002;
/// Response code for a record type with broken rule metadata.
pub const CODE_DEFINITION: u16 = 5000;

/// Failure of [`VerifyPipe`].
#[derive(Error, Debug)]
pub enum PipeError {
    /// The body or query string did not decode into the record type
    #[error("malformed request parameters: {0}")]
    Decode(String),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl PipeError {
    /// Application-level code reported to the client.
    pub fn code(&self) -> u16 {
        match self {
            PipeError::Decode(_) => CODE_DECODE,
            PipeError::Verify(VerifyError::Invalid(_)) => CODE_INVALID,
            PipeError::Verify(VerifyError::Definition(_)) => CODE_DEFINITION,
        }
    }

    /// HTTP status suited to the failure.
    pub fn status(&self) -> u16 {
        match self {
            PipeError::Decode(_) => 400,
            PipeError::Verify(VerifyError::Invalid(_)) => 422,
            PipeError::Verify(VerifyError::Definition(_)) => 500,
        }
    }

    /// Render as a `{"code", "msg", "tip"}` payload.
    ///
    /// For rule violations `tip` is exactly the authored message.
    pub fn to_json(&self) -> serde_json::Value {
        let msg = match self {
            PipeError::Decode(_) => "missing or malformed parameters",
            PipeError::Verify(VerifyError::Invalid(_)) => "parameter rule violated",
            PipeError::Verify(VerifyError::Definition(_)) => "invalid rule definition",
        };
        let tip = match self {
            PipeError::Decode(reason) => reason.clone(),
            PipeError::Verify(error) => error.to_string(),
        };
        serde_json::json!({
            "code": self.code(),
            "msg": msg,
            "tip": tip,
        })
    }
}

/// Decodes request parameters into a record and verifies it.
///
/// Binding stays with serde; the pipe only runs [`Verify`] on the result,
/// so handlers get a record that already satisfies its rules.
pub struct VerifyPipe;

impl VerifyPipe {
    /// Decode a JSON body and verify it.
    pub fn json<T>(body: &[u8]) -> Result<T, PipeError>
    where
        T: DeserializeOwned + Verify,
    {
        let parsed: T =
            serde_json::from_slice(body).map_err(|e| PipeError::Decode(e.to_string()))?;
        parsed.verify()?;
        Ok(parsed)
    }

    /// Decode a URL query string (without the leading `?`) and verify it.
    pub fn query<T>(query: &str) -> Result<T, PipeError>
    where
        T: DeserializeOwned + Verify,
    {
        let parsed: T =
            serde_urlencoded::from_str(query).map_err(|e| PipeError::Decode(e.to_string()))?;
        parsed.verify()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDescriptor, FieldValue, IntoFieldValue, Rule, RuleKind};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        user: String,
        remember: Option<bool>,
    }

    fn user(l: &Login) -> FieldValue<'_> {
        l.user.field_value()
    }
    fn remember(l: &Login) -> FieldValue<'_> {
        l.remember.field_value()
    }

    static LOGIN_FIELDS: [FieldDescriptor<Login>; 2] = [
        FieldDescriptor {
            name: "user",
            kind: <String as IntoFieldValue>::KIND,
            rules: &[
                Rule::new(RuleKind::Required, "user is required"),
                Rule::new(RuleKind::MinLength, "3:user is too short"),
            ],
            value: user,
        },
        FieldDescriptor {
            name: "remember",
            kind: <Option<bool> as IntoFieldValue>::KIND,
            rules: &[Rule::new(RuleKind::Required, "remember must be set")],
            value: remember,
        },
    ];

    impl Verify for Login {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &LOGIN_FIELDS
        }
    }

    #[test]
    fn test_json_pipe() {
        let login: Login = VerifyPipe::json(br#"{"user":"alice","remember":false}"#).unwrap();
        assert_eq!(login.user, "alice");
        assert_eq!(login.remember, Some(false));
    }

    #[test]
    fn test_json_pipe_violation() {
        let error = VerifyPipe::json::<Login>(br#"{"user":"al","remember":true}"#).unwrap_err();
        assert_eq!(error.code(), CODE_INVALID);
        assert_eq!(error.status(), 422);

        let json = error.to_json();
        assert_eq!(json["code"], 4002);
        assert_eq!(json["tip"], "user is too short");
    }

    #[test]
    fn test_json_pipe_decode_error() {
        let error = VerifyPipe::json::<Login>(b"{not json").unwrap_err();
        assert!(matches!(error, PipeError::Decode(_)));
        assert_eq!(error.code(), CODE_DECODE);
        assert_eq!(error.to_json()["code"], 4001);
    }

    #[test]
    fn test_query_pipe() {
        let login: Login = VerifyPipe::query("user=alice&remember=true").unwrap();
        assert_eq!(login.remember, Some(true));

        let error = VerifyPipe::query::<Login>("user=alice").unwrap_err();
        assert_eq!(error.to_string(), "remember must be set");
    }
}
