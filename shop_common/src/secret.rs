use std::fmt::{self, Debug, Display};

/// A wrapper for configuration values that must never leak into logs, such as the payment provider's API key
/// and the webhook signing secret. Both `Debug` and `Display` render a fixed placeholder, so a secret buried
/// inside a config struct stays hidden even under `{:?}`. The wrapped value is only reachable through an
/// explicit [`Secret::reveal`] at the point of use, which keeps every disclosure greppable.
#[derive(Clone, Default)]
pub struct Secret<T> {
    value: T,
}

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Deliberate access to the wrapped value.
    pub fn reveal(&self) -> &T {
        &self.value
    }

    /// Unwraps the secret, consuming the wrapper.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

impl<T> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
