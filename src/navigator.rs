use crate::error::Result;

/// The full-page-navigation side effect (the client-side equivalent of an
/// HTTP redirect). Implementations hand `url` to whatever environment hosts
/// the page: `window.location` in a browser embedding, an intent launcher in
/// a webview shell, a recording stub in tests.
///
/// A returned error means the environment rejected the navigation
/// synchronously; the resolver treats that as `NavigationRejected` for the
/// scheme URL and `StoreRedirectFailed` for a store URL. Navigations that
/// fail later (after control left the page) are invisible here, which is
/// exactly the gap the timing/visibility heuristic exists to cover.
pub trait Navigator {
    fn navigate(&mut self, url: &str) -> Result<()>;
}
