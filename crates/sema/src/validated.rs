//! Error-accumulating results
//!
//! [`Validated`] is either a value or the non-empty list of diagnostics that
//! prevented it. Combining two results keeps the errors of both, so a pass
//! can evaluate every branch of a tree and still report all problems at once.

use crate::common::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(Vec<Diagnostic>),
}

impl<T> Validated<T> {
    pub fn error(diagnostic: Diagnostic) -> Self {
        Self::Invalid(vec![diagnostic])
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Self::Valid(value) => Validated::Valid(f(value)),
            Self::Invalid(errors) => Validated::Invalid(errors),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Validated<U>) -> Validated<U> {
        match self {
            Self::Valid(value) => f(value),
            Self::Invalid(errors) => Validated::Invalid(errors),
        }
    }

    /// Pairs two results; errors of `self` come before those of `other`
    pub fn combine<U>(self, other: Validated<U>) -> Validated<(T, U)> {
        match (self, other) {
            (Self::Valid(a), Validated::Valid(b)) => Validated::Valid((a, b)),
            (Self::Valid(_), Validated::Invalid(errors))
            | (Self::Invalid(errors), Validated::Valid(_)) => Validated::Invalid(errors),
            (Self::Invalid(mut errors), Validated::Invalid(more)) => {
                errors.extend(more);
                Validated::Invalid(errors)
            }
        }
    }

    pub fn into_result(self) -> Result<T, Vec<Diagnostic>> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// All values, or every error in iteration order
impl<T> FromIterator<Validated<T>> for Validated<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Validated<T>>>(iter: I) -> Self {
        let mut values = Vec::new();
        let mut errors = Vec::new();
        for item in iter {
            match item {
                Validated::Valid(value) => values.push(value),
                Validated::Invalid(more) => errors.extend(more),
            }
        }
        if errors.is_empty() {
            Validated::Valid(values)
        } else {
            Validated::Invalid(errors)
        }
    }
}
