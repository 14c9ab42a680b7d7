use async_trait::async_trait;

/// Supplies the signed-in renter's email, or `None` when nobody is.
/// Backed by the hosted auth service in the app; fixed in tests and tools.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn current_email(&self) -> Option<String>;
}

#[derive(Debug)]
pub struct StaticIdentity {
    email: String,
}

impl StaticIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[async_trait]
impl IdentitySource for StaticIdentity {
    async fn current_email(&self) -> Option<String> {
        Some(self.email.clone())
    }
}
