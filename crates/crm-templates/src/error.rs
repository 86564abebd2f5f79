use thiserror::Error;

/// Errors raised by the accessor cache and the resolver.
///
/// Unresolvable placeholders are not errors; they substitute to empty text.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("resolver has been disposed")]
    Disposed,

    #[error("accessor table lock poisoned: {0}")]
    LockPoisoned(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_disposed() {
        assert_eq!(
            TemplateError::Disposed.to_string(),
            "resolver has been disposed"
        );
    }

    #[test]
    fn display_lock_poisoned() {
        let e = TemplateError::LockPoisoned("writer panicked".into());
        assert_eq!(e.to_string(), "accessor table lock poisoned: writer panicked");
    }
}
