//! Raw status codes returned by secret-store engines.

use std::fmt;

/// Status code returned by every secret-store engine operation.
///
/// Values follow the platform security-framework result codes so that an
/// engine backed by the real platform store can pass codes through verbatim.
/// Codes the gateway does not classify are surfaced unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    /// The operation completed successfully.
    pub const SUCCESS: Self = Self(0);
    /// Function or operation not implemented by the engine.
    pub const UNIMPLEMENTED: Self = Self(-4);
    /// One or more parameters passed to the engine were not valid.
    pub const PARAM: Self = Self(-50);
    /// The engine failed to allocate memory.
    pub const ALLOCATE: Self = Self(-108);
    /// No secret store is available.
    pub const NOT_AVAILABLE: Self = Self(-25291);
    /// An item with the same identity already exists.
    pub const DUPLICATE_ITEM: Self = Self(-25299);
    /// The specified item could not be found.
    pub const ITEM_NOT_FOUND: Self = Self(-25300);
    /// User interaction is required but not allowed (e.g. device locked).
    pub const INTERACTION_NOT_ALLOWED: Self = Self(-25308);
    /// The caller's credentials were rejected by the engine.
    pub const AUTH_FAILED: Self = Self(-25293);
    /// The engine could not decode the provided data.
    pub const DECODE: Self = Self(-26275);

    /// Returns `true` for [`Status::SUCCESS`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Human-readable description of the status code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SUCCESS => "no error",
            Self::UNIMPLEMENTED => "function or operation not implemented",
            Self::PARAM => "one or more parameters were not valid",
            Self::ALLOCATE => "failed to allocate memory",
            Self::NOT_AVAILABLE => "no secret store is available",
            Self::DUPLICATE_ITEM => "the specified item already exists in the store",
            Self::ITEM_NOT_FOUND => "the specified item could not be found in the store",
            Self::INTERACTION_NOT_ALLOWED => "user interaction is not allowed",
            Self::AUTH_FAILED => "the provided credentials were not correct",
            Self::DECODE => "unable to decode the provided data",
            Self(_) => "unclassified secret store error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(
            format!("{}", Status::DUPLICATE_ITEM),
            "-25299 (the specified item already exists in the store)"
        );
        assert_eq!(format!("{}", Status(-99999)), "-99999 (unclassified secret store error)");
    }

    #[test]
    fn test_status_success() {
        assert!(Status::SUCCESS.is_success());
        assert!(!Status::ITEM_NOT_FOUND.is_success());
    }
}
