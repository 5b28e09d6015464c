use std::fmt;

/// Credentials of the signed-in user, handed explicitly to whatever talks to
/// the attendance backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// keeps the token out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("email", &self.email)
            .finish()
    }
}
