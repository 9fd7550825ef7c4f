//! Explicit result of resolving a reference by id.

/// Outcome of resolving an id against a collection.
///
/// Transactions may reference customers or value types that were deleted
/// since; nothing enforces referential integrity in the store, so every
/// consumer has to decide what `NotFound` means for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The referenced entity exists.
    Found(T),
    /// The reference is dangling.
    NotFound,
}

impl<T> Lookup<T> {
    /// Builds a lookup from an optional value.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Found(v),
            None => Self::NotFound,
        }
    }

    /// Returns true if the reference resolved.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts into an `Option`.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound => None,
        }
    }

    /// Maps the found value.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Self::Found(v) => Lookup::Found(f(v)),
            Self::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_option() {
        assert_eq!(Lookup::from(Some(3)), Lookup::Found(3));
        assert_eq!(Lookup::<i32>::from(None), Lookup::NotFound);
    }

    #[test]
    fn test_lookup_map_and_found() {
        let found = Lookup::Found("gram").map(str::len);
        assert!(found.is_found());
        assert_eq!(found.found(), Some(4));
        assert_eq!(Lookup::<&str>::NotFound.map(str::len).found(), None);
    }
}
