//! Protection-class attribute for stored items.

use strum::{Display, EnumString};

/// When a stored item's payload becomes readable relative to device lock
/// state, and whether it migrates to a new device on restore.
///
/// Applied per write by the gateway; changing the facade's accessibility does
/// not retroactively re-protect items that were already written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Accessibility {
    /// Readable once the device has been unlocked at least once since boot.
    AfterFirstUnlock,
    /// Like [`Accessibility::AfterFirstUnlock`], but never leaves the device.
    AfterFirstUnlockDeviceOnly,
    /// Always readable. Deprecated by the platform; stored items fall back to
    /// the after-first-unlock device-only protection class.
    Always,
    /// Like [`Accessibility::Always`], device only. Same platform fallback.
    AlwaysDeviceOnly,
    /// Readable only while the device is unlocked.
    #[default]
    WhenUnlocked,
    /// Like [`Accessibility::WhenUnlocked`], but never leaves the device.
    WhenUnlockedDeviceOnly,
}

impl Accessibility {
    /// The attribute value carried in every store query.
    ///
    /// The always-accessible classes were deprecated by the platform; both
    /// map onto the after-first-unlock device-only attribute.
    #[must_use]
    pub const fn attribute_value(self) -> &'static str {
        match self {
            Self::AfterFirstUnlock => "after_first_unlock",
            Self::AfterFirstUnlockDeviceOnly | Self::Always | Self::AlwaysDeviceOnly => {
                "after_first_unlock_device_only"
            }
            Self::WhenUnlocked => "when_unlocked",
            Self::WhenUnlockedDeviceOnly => "when_unlocked_device_only",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deprecated_classes_fall_back_to_device_only() {
        assert_eq!(
            Accessibility::Always.attribute_value(),
            "after_first_unlock_device_only"
        );
        assert_eq!(
            Accessibility::AlwaysDeviceOnly.attribute_value(),
            "after_first_unlock_device_only"
        );
        // The non-deprecated classes keep their own attributes.
        assert_eq!(
            Accessibility::AfterFirstUnlock.attribute_value(),
            "after_first_unlock"
        );
    }

    #[test]
    fn test_string_form() {
        assert_eq!(Accessibility::WhenUnlocked.to_string(), "when_unlocked");
        assert_eq!(
            "after_first_unlock".parse::<Accessibility>().unwrap(),
            Accessibility::AfterFirstUnlock
        );
    }
}
