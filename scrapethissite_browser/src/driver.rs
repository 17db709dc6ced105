//! The [`Driver`] and [`Element`] traits every browser backend implements.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Error, Locator};

/// A live browser page that can be navigated and queried.
///
/// Implemented by [`WebDriverSession`](crate::WebDriverSession) for a real
/// browser and by [`StaticDriver`](crate::StaticDriver) for server-rendered
/// HTML without JavaScript.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Handle to an element found on the current page.
    type Element: Element;

    /// Loads `url` in the current window.
    async fn goto(&self, url: &str) -> Result<(), Error>;

    /// URL of the page currently loaded.
    async fn current_url(&self) -> Result<String, Error>;

    /// The page's `document.readyState` (`loading`, `interactive` or `complete`).
    async fn ready_state(&self) -> Result<String, Error>;

    /// All elements matching `locator`, in document order. An empty list is not an error.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, Error>;

    /// First element matching `locator`.
    async fn find(&self, locator: &Locator) -> Result<Self::Element, Error> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                locator: locator.to_string(),
            })
    }

    /// Sets how long element lookups block before reporting no match.
    async fn set_implicit_wait(&self, wait: Duration) -> Result<(), Error>;

    /// Ends the session and releases the browser.
    async fn quit(self) -> Result<(), Error>
    where
        Self: Sized;
}

/// An element on a page.
#[async_trait]
pub trait Element: Clone + Send + Sync + 'static {
    /// Visible text with whitespace collapsed.
    async fn text(&self) -> Result<String, Error>;

    /// Value of the named attribute, if present.
    async fn attr(&self, name: &str) -> Result<Option<String>, Error>;

    /// Whether the element is rendered and visible.
    async fn is_displayed(&self) -> Result<bool, Error>;

    async fn click(&self) -> Result<(), Error>;

    /// Descendants matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, Error>;

    /// First descendant matching `locator`.
    async fn find(&self, locator: &Locator) -> Result<Self, Error> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                locator: locator.to_string(),
            })
    }
}
