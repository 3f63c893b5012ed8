//! OAuth token-exchange models.
//!
//! These use snake_case wire keys, following RFC 6749 / RFC 8693 rather
//! than the catalog API's kebab-case convention.

use lakecat_wire::{
    FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireError, WireModel, WireResult,
};
use std::sync::{Arc, OnceLock};

/// Token type identifier, from RFC 8693 Section 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// `urn:ietf:params:oauth:token-type:access_token`
    AccessToken,
    /// `urn:ietf:params:oauth:token-type:refresh_token`
    RefreshToken,
    /// `urn:ietf:params:oauth:token-type:id_token`
    IdToken,
    /// `urn:ietf:params:oauth:token-type:saml1`
    Saml1,
    /// `urn:ietf:params:oauth:token-type:saml2`
    Saml2,
    /// `urn:ietf:params:oauth:token-type:jwt`
    Jwt,
}

impl TokenType {
    /// The wire value for this token type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "urn:ietf:params:oauth:token-type:access_token",
            Self::RefreshToken => "urn:ietf:params:oauth:token-type:refresh_token",
            Self::IdToken => "urn:ietf:params:oauth:token-type:id_token",
            Self::Saml1 => "urn:ietf:params:oauth:token-type:saml1",
            Self::Saml2 => "urn:ietf:params:oauth:token-type:saml2",
            Self::Jwt => "urn:ietf:params:oauth:token-type:jwt",
        }
    }

    /// Parses a wire value.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for URNs outside the enum.
    pub fn parse(value: &str) -> WireResult<Self> {
        match value {
            "urn:ietf:params:oauth:token-type:access_token" => Ok(Self::AccessToken),
            "urn:ietf:params:oauth:token-type:refresh_token" => Ok(Self::RefreshToken),
            "urn:ietf:params:oauth:token-type:id_token" => Ok(Self::IdToken),
            "urn:ietf:params:oauth:token-type:saml1" => Ok(Self::Saml1),
            "urn:ietf:params:oauth:token-type:saml2" => Ok(Self::Saml2),
            "urn:ietf:params:oauth:token-type:jwt" => Ok(Self::Jwt),
            other => Err(WireError::type_mismatch(
                "issued_token_type",
                "token type URN",
                other,
            )),
        }
    }
}

/// Response from the token-exchange endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthTokenResponse {
    /// The access token issued.
    pub access_token: String,

    /// Access token scheme, per RFC 6749 (`bearer` in practice).
    pub token_type: String,

    /// Lifetime of the token in seconds.
    pub expires_in: Option<i64>,

    /// RFC 8693 identifier for the issued token.
    pub issued_token_type: Option<TokenType>,

    /// Refresh token, when the grant produced one.
    pub refresh_token: Option<String>,

    /// Granted scopes.
    pub scope: Option<String>,
}

fn oauth_token_response_schema() -> &'static Arc<ModelSchema> {
    static SCHEMA: OnceLock<Arc<ModelSchema>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        ModelSchema::builder("OAuthTokenResponse")
            .field(FieldDescriptor::required(
                "access_token",
                "access_token",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::required(
                "token_type",
                "token_type",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "expires_in",
                "expires_in",
                FieldKind::Scalar(ScalarKind::Integer),
            ))
            .field(FieldDescriptor::optional(
                "issued_token_type",
                "issued_token_type",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "refresh_token",
                "refresh_token",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .field(FieldDescriptor::optional(
                "scope",
                "scope",
                FieldKind::Scalar(ScalarKind::String),
            ))
            .build()
            .expect("OAuthTokenResponse schema is statically valid")
    })
}

impl WireModel for OAuthTokenResponse {
    fn schema() -> &'static Arc<ModelSchema> {
        oauth_token_response_schema()
    }

    fn to_record(&self) -> WireResult<Record> {
        Record::builder(Self::schema())
            .set_str("access_token", self.access_token.as_str())
            .set_str("token_type", self.token_type.as_str())
            .set_i64_opt("expires_in", self.expires_in)
            .set_str_opt(
                "issued_token_type",
                self.issued_token_type.map(TokenType::as_str),
            )
            .set_str_opt("refresh_token", self.refresh_token.as_deref())
            .set_str_opt("scope", self.scope.as_deref())
            .build()
    }

    fn from_record(record: &Record) -> WireResult<Self> {
        Ok(Self {
            access_token: record.require_str("access_token")?.to_string(),
            token_type: record.require_str("token_type")?.to_string(),
            expires_in: record.i64_opt("expires_in")?,
            issued_token_type: record
                .str_opt("issued_token_type")?
                .map(TokenType::parse)
                .transpose()?,
            refresh_token: record.str_opt("refresh_token")?.map(str::to_string),
            scope: record.str_opt("scope")?.map(str::to_string),
        })
    }
}
