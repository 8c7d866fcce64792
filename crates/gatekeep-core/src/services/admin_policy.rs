//! Authorization policy deciding which subjects get the admin flag.

/// Decides whether a subject is an administrator.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, email: &str) -> bool;
}

impl<F> AdminPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_admin(&self, email: &str) -> bool {
        self(email)
    }
}

/// Grants admin to every email ending with a trusted suffix, e.g. `@test.com`.
///
/// This is a coarse heuristic, not a role table. Swap in another
/// [`AdminPolicy`] to change it.
#[derive(Debug, Clone)]
pub struct EmailSuffixPolicy {
    suffix: String,
}

impl EmailSuffixPolicy {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl AdminPolicy for EmailSuffixPolicy {
    fn is_admin(&self, email: &str) -> bool {
        !self.suffix.is_empty() && email.ends_with(&self.suffix)
    }
}
