//! Mock identities for integration tests.
//!
//! Services authenticate with HS256 bearer tokens. `MockAuth` signs a real token with the
//! secret the test router was built with, so requests go through the production
//! extractors unchanged.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use roofline_auth_types::token::{ACCOUNT_TOKEN_TTL_SECS, ADMIN_TOKEN_TTL_SECS, issue_token};
use roofline_domain::account::{AccountRole, AdminRole};

/// Identity injected into test requests.
pub struct MockAuth {
    pub subject: Uuid,
    role: &'static str,
    ttl_secs: u64,
    secret: String,
}

impl MockAuth {
    pub fn account(role: AccountRole, secret: &str) -> Self {
        Self {
            subject: Uuid::new_v4(),
            role: role.as_str(),
            ttl_secs: ACCOUNT_TOKEN_TTL_SECS,
            secret: secret.to_owned(),
        }
    }

    pub fn admin(role: AdminRole, secret: &str) -> Self {
        Self {
            subject: Uuid::new_v4(),
            role: role.as_str(),
            ttl_secs: ADMIN_TOKEN_TTL_SECS,
            secret: secret.to_owned(),
        }
    }

    pub fn with_subject(mut self, subject: Uuid) -> Self {
        self.subject = subject;
        self
    }

    /// `Bearer <jwt>` header value.
    pub fn bearer(&self) -> String {
        let issued = issue_token(self.subject, self.role, self.ttl_secs, &self.secret)
            .expect("sign test token");
        format!("Bearer {}", issued.token)
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.bearer()).expect("bearer header value"),
        );
        map
    }
}
