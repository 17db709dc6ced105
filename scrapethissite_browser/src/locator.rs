//! Element locators shared by every [`Driver`](crate::Driver) backend.

use std::fmt;

/// How to find elements on a page.
///
/// Backends translate each variant into their native query: the WebDriver
/// backend sends CSS or XPath to the browser, the static backend evaluates it
/// against parsed HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector, e.g. `table.table tr.team`.
    Css(String),
    /// An anchor whose visible text contains the given substring.
    LinkText(String),
}

impl Locator {
    /// Creates a CSS locator.
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates a locator for a link whose text contains `text`.
    pub fn link_containing(text: impl Into<String>) -> Self {
        Self::LinkText(text.into())
    }

    /// XPath equivalent of a [`Locator::LinkText`], used by the WebDriver backend.
    pub(crate) fn link_xpath(text: &str) -> String {
        if text.contains('\'') {
            format!("//a[contains(text(), \"{}\")]", text)
        } else {
            format!("//a[contains(text(), '{}')]", text)
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css `{}`", selector),
            Self::LinkText(text) => write!(f, "link containing `{}`", text),
        }
    }
}
