//! The pricing context attached to every price request.

use std::fmt;

/// Identifying parameters that decide which price tier a quote reflects.
///
/// Supplied once at launch and sent verbatim with every price request.
/// Both parts are optional; an empty context asks for the public tier.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PricingContext {
    /// Customer tier tag, sent as `userType`
    pub user_type: Option<String>,
    /// Credential for dealer tiers, sent as `password`
    pub password: Option<String>,
}

impl PricingContext {
    pub fn new(user_type: Option<String>, password: Option<String>) -> Self {
        Self {
            user_type: user_type.filter(|s| !s.is_empty()),
            password: password.filter(|s| !s.is_empty()),
        }
    }

    /// The public tier: no tier tag, no credential.
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.user_type.is_none() && self.password.is_none()
    }

    /// Query parameters to append to a price request.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(2);
        if let Some(user_type) = &self.user_type {
            params.push(("userType", user_type.as_str()));
        }
        if let Some(password) = &self.password {
            params.push(("password", password.as_str()));
        }
        params
    }
}

// Keeps credentials out of logs.
impl fmt::Debug for PricingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PricingContext")
            .field("user_type", &self.user_type)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl fmt::Display for PricingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.user_type, &self.password) {
            (None, None) => f.write_str("public"),
            (Some(tier), None) => write!(f, "{tier}"),
            (Some(tier), Some(_)) => write!(f, "{tier} (authenticated)"),
            (None, Some(_)) => f.write_str("authenticated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let ctx = PricingContext::new(Some("dealer".into()), Some("s3cret".into()));
        assert_eq!(
            ctx.query_params(),
            vec![("userType", "dealer"), ("password", "s3cret")]
        );
        assert!(PricingContext::public().query_params().is_empty());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let ctx = PricingContext::new(Some(String::new()), None);
        assert!(ctx.is_public());
    }

    #[test]
    fn test_debug_hides_password() {
        let ctx = PricingContext::new(Some("dealer".into()), Some("s3cret".into()));
        let debug = format!("{ctx:?}");
        assert!(!debug.contains("s3cret"));
        assert_eq!(ctx.to_string(), "dealer (authenticated)");
    }
}
