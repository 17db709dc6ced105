//! WebDriver backend built on `fantoccini`.
//!
//! Talks to a running chromedriver or geckodriver. The session is created by
//! [`WebDriverSession::connect`] and must be released with [`Driver::quit`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Driver, Element, Error, Locator};

/// Browsers the WebDriver backend knows how to configure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            other => Err(Error::Session(format!("unsupported browser '{}'", other))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Firefox => write!(f, "firefox"),
        }
    }
}

/// Settings used when opening a WebDriver session.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// WebDriver endpoint, e.g. `http://localhost:9515` for chromedriver.
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// Extra command-line arguments for the browser process.
    pub args: Vec<String>,
    /// Implicit wait applied to element lookups right after connecting.
    pub implicit_wait: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            args: vec![
                "--start-maximized".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
            ],
            implicit_wait: Duration::from_secs(5),
        }
    }
}

impl SessionOptions {
    /// W3C capabilities for the configured browser.
    pub fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut args = self.args.clone();
        let mut caps = serde_json::Map::new();
        match self.browser {
            BrowserKind::Chrome => {
                if self.headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                }
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                if self.headless {
                    args.push("--headless".to_string());
                }
                // Chrome-only switches make geckodriver refuse to start.
                args.retain(|a| a != "--disable-blink-features=AutomationControlled");
                caps.insert("browserName".to_string(), json!("firefox"));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

/// A browser session driven over the WebDriver protocol.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Opens a new session against `options.webdriver_url`.
    pub async fn connect(options: &SessionOptions) -> Result<Self, Error> {
        tracing::info!(
            "Creating {} session via {}",
            options.browser,
            options.webdriver_url
        );
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to WebDriver: {}", e);
                Error::from(e)
            })?;
        let session = Self { client };
        session.set_implicit_wait(options.implicit_wait).await?;
        tracing::info!("Browser session ready");
        Ok(session)
    }
}

/// Owned form of a [`Locator`] that can lend out a `fantoccini::Locator`.
enum NativeQuery {
    Css(String),
    XPath(String),
}

impl NativeQuery {
    fn new(locator: &Locator) -> Self {
        match locator {
            Locator::Css(selector) => Self::Css(selector.clone()),
            Locator::LinkText(text) => Self::XPath(Locator::link_xpath(text)),
        }
    }

    fn as_locator(&self) -> fantoccini::Locator<'_> {
        match self {
            Self::Css(selector) => fantoccini::Locator::Css(selector),
            Self::XPath(xpath) => fantoccini::Locator::XPath(xpath),
        }
    }
}

#[async_trait]
impl Driver for WebDriverSession {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> Result<(), Error> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, Error> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn ready_state(&self) -> Result<String, Error> {
        let value = self
            .client
            .execute("return document.readyState", vec![])
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<WebElement>, Error> {
        let query = NativeQuery::new(locator);
        let found = self.client.find_all(query.as_locator()).await?;
        Ok(found.into_iter().map(|inner| WebElement { inner }).collect())
    }

    async fn set_implicit_wait(&self, wait: Duration) -> Result<(), Error> {
        self.client
            .update_timeouts(TimeoutConfiguration::new(None, None, Some(wait)))
            .await?;
        Ok(())
    }

    async fn quit(self) -> Result<(), Error> {
        tracing::info!("Quitting browser session");
        self.client.close().await?;
        Ok(())
    }
}

/// An element handle inside a [`WebDriverSession`].
#[derive(Clone, Debug)]
pub struct WebElement {
    inner: fantoccini::elements::Element,
}

#[async_trait]
impl Element for WebElement {
    async fn text(&self) -> Result<String, Error> {
        Ok(self.inner.text().await?.trim().to_string())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, Error> {
        Ok(self.inner.attr(name).await?)
    }

    async fn is_displayed(&self) -> Result<bool, Error> {
        Ok(self.inner.is_displayed().await?)
    }

    async fn click(&self) -> Result<(), Error> {
        self.inner.click().await?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, Error> {
        let query = NativeQuery::new(locator);
        let found = self.inner.find_all(query.as_locator()).await?;
        Ok(found.into_iter().map(|inner| WebElement { inner }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_capabilities_carry_default_args() {
        let caps = SessionOptions::default().capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--start-maximized")));
        assert!(args.contains(&json!("--disable-blink-features=AutomationControlled")));
        assert!(!args.contains(&json!("--headless=new")));
    }

    #[test]
    fn headless_chrome_adds_flags() {
        let options = SessionOptions {
            headless: true,
            ..SessionOptions::default()
        };
        let caps = options.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
    }

    #[test]
    fn firefox_drops_chrome_only_switches() {
        let options = SessionOptions {
            browser: BrowserKind::Firefox,
            headless: true,
            ..SessionOptions::default()
        };
        let caps = options.capabilities();
        assert_eq!(caps["browserName"], json!("firefox"));
        let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless")));
        assert!(!args.contains(&json!("--disable-blink-features=AutomationControlled")));
    }

    #[test]
    fn browser_kind_parses_aliases() {
        assert_eq!("Chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("firefox".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert!("safari".parse::<BrowserKind>().is_err());
    }
}
