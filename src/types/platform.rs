/// Coarse platform category derived once from the raw User-Agent string.
///
/// Immutable per page load. `is_mobile` comes from the broader `Mobi|Android`
/// match, so it is not simply `is_ios || is_android`: an iOS UA that carries
/// neither `Mobi` nor `Android` classifies as `is_ios` but not `is_mobile`.
/// That mismatch is a documented limitation of the heuristic, kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub is_ios: bool,
    pub is_android: bool,
    pub is_mobile: bool,
    pub is_desktop: bool,
}

impl PlatformInfo {
    /// The classification every UA without mobile markers falls through to.
    pub fn desktop() -> Self {
        Self {
            is_ios: false,
            is_android: false,
            is_mobile: false,
            is_desktop: true,
        }
    }

    /// Display name used in status notifications.
    pub fn name(&self) -> &'static str {
        if self.is_ios {
            "iOS"
        } else if self.is_android {
            "Android"
        } else {
            "Desktop"
        }
    }
}
