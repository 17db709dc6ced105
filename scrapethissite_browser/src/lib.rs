//! Browser sessions for the scrapethissite scraper.
//!
//! The [`Driver`] trait abstracts over a WebDriver-controlled browser
//! ([`WebDriverSession`]) and static server-rendered HTML ([`StaticDriver`]).
//! [`wait`] holds the bounded polling helpers both backends share.

mod driver;
mod errors;
mod locator;
mod static_html;
mod user_agent;
pub mod wait;
mod webdriver;

pub use self::driver::{Driver, Element};
pub use self::errors::Error;
pub use self::locator::Locator;
pub use self::static_html::{StaticDriver, StaticElement};
pub use self::wait::WaitOptions;
pub use self::webdriver::{BrowserKind, SessionOptions, WebDriverSession, WebElement};
