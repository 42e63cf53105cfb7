use fancy_regex::Regex;

use crate::error::Result;
use crate::marker::MarkerPrefilter;
use crate::types::PlatformInfo;

/// iOS device markers. Matched case-sensitively: `ipad` in some random token
/// must not classify as iOS.
const IOS_PATTERN: &str = "iPad|iPhone|iPod";
/// Android marker, matched case-insensitively.
const ANDROID_PATTERN: &str = "android";
/// Broad mobile marker, matched case-insensitively. Wider than the iOS and
/// Android flags alone: `Mobi` also catches Mobile/eliboM-style tokens.
const MOBILE_PATTERN: &str = "Mobi|Android";

/// Pre-compiled classification patterns. Compiling them once at construction
/// keeps `classify()` a pure, allocation-free function of the UA string.
pub struct PlatformClassifier {
    prefilter: MarkerPrefilter,
    ios: Regex,
    android: Regex,
    mobile: Regex,
}

impl PlatformClassifier {
    pub fn new() -> Result<Self> {
        let mk_ci = |pattern: &str| -> Result<Regex> {
            Ok(Regex::new(&format!("(?i)(?:{})", pattern))?)
        };
        Ok(Self {
            prefilter: MarkerPrefilter::from_patterns([
                IOS_PATTERN,
                ANDROID_PATTERN,
                MOBILE_PATTERN,
            ])?,
            ios: Regex::new(IOS_PATTERN)?,
            android: mk_ci(ANDROID_PATTERN)?,
            mobile: mk_ci(MOBILE_PATTERN)?,
        })
    }

    /// Derive the platform category from a raw User-Agent string.
    ///
    /// Pure function of the input; no error conditions. An empty or malformed
    /// UA, or one without any mobile marker literal, falls through to the
    /// desktop classification. iOS takes precedence over Android when a UA
    /// somehow carries both marker sets, so at most one of the two is set.
    pub fn classify(&self, ua: &str) -> PlatformInfo {
        if ua.is_empty() || !self.prefilter.may_match(ua) {
            return PlatformInfo::desktop();
        }

        let is_ios = self.ios.is_match(ua).unwrap_or(false);
        let is_android = !is_ios && self.android.is_match(ua).unwrap_or(false);
        let is_mobile = self.mobile.is_match(ua).unwrap_or(false);

        PlatformInfo {
            is_ios,
            is_android,
            is_mobile,
            is_desktop: !is_mobile,
        }
    }
}
