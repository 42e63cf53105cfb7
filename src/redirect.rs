use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::navigator::Navigator;
use crate::observer::ResolverObserver;
use crate::types::PlatformInfo;

/// Store listing URL for a platform: iOS goes to the App Store, everything
/// else (Android and desktop alike) to the Play Store. The desktop default
/// is an inherited asymmetry, preserved as-is.
pub fn store_url<'a>(platform: &PlatformInfo, config: &'a ResolverConfig) -> &'a str {
    if platform.is_ios {
        &config.app_store_url
    } else {
        &config.play_store_url
    }
}

/// Issue the fallback store redirect. Notifies the observer of the scheduled
/// redirect (carrying the presentational delay for the host to apply), then
/// performs the navigation. A synchronous navigation failure is terminal:
/// reported to the observer and returned as `StoreRedirectFailed`, never
/// retried.
pub(crate) fn redirect_to_store(
    platform: &PlatformInfo,
    config: &ResolverConfig,
    navigator: &mut impl Navigator,
    observer: &mut impl ResolverObserver,
) -> Result<()> {
    let url = store_url(platform, config);
    tracing::debug!(platform = platform.name(), url, "redirecting to store");
    observer.redirect_scheduled(url, config.redirect_delay());

    match navigator.navigate(url) {
        Ok(()) => {
            observer.redirect_issued(url);
            Ok(())
        }
        Err(err) => {
            let reason = err.to_string();
            tracing::warn!(url, %reason, "store redirect failed");
            observer.redirect_failed(url, &reason);
            Err(Error::StoreRedirectFailed {
                url: url.to_string(),
                reason,
            })
        }
    }
}
