//! Static HTML backend: server-rendered pages parsed with `scraper`.
//!
//! Pages come either from an HTTP fetch or from an in-memory map keyed by
//! absolute URL. No JavaScript runs. Clicking an anchor navigates to its
//! resolved `href`; a same-page `#` anchor navigates to `#<id>` of the current
//! URL, which lets an in-memory site stand in for client-rendered views.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::user_agent::get_user_agent;
use crate::{Driver, Element, Error, Locator};

enum PageSource {
    Memory(HashMap<String, String>),
    Http(reqwest::Client),
}

/// A loaded page. Element handles keep their own snapshot.
struct Document {
    url: Url,
    html: String,
}

struct Shared {
    source: PageSource,
    current: Mutex<Option<Arc<Document>>>,
}

/// A [`Driver`] over static HTML.
#[derive(Clone)]
pub struct StaticDriver {
    shared: Arc<Shared>,
}

impl StaticDriver {
    /// Serves pages from memory. Keys are absolute URLs.
    pub fn from_pages<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pages = pages
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::with_source(PageSource::Memory(pages))
    }

    /// Fetches pages over HTTP with browser-like headers. A request that takes
    /// longer than `timeout` fails with [`Error::Http`].
    pub fn http(timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self::with_source(PageSource::Http(http)))
    }

    fn with_source(source: PageSource) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                current: Mutex::new(None),
            }),
        }
    }

    async fn load(&self, url: &Url) -> Result<String, Error> {
        match &self.shared.source {
            PageSource::Memory(pages) => {
                let mut bare = url.clone();
                bare.set_fragment(None);
                pages
                    .get(url.as_str())
                    .or_else(|| pages.get(bare.as_str()))
                    .cloned()
                    .ok_or_else(|| Error::HttpStatus {
                        status: 404,
                        url: url.to_string(),
                    })
            }
            PageSource::Http(http) => {
                let mut request_url = url.clone();
                request_url.set_fragment(None);
                let resp = http
                    .get(request_url)
                    .header("accept", "text/html,application/xhtml+xml")
                    .header("accept-language", "en-US,en;q=0.9")
                    .header("cache-control", "no-cache")
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    tracing::error!("Request for {} failed with status {}", url, resp.status());
                    return Err(Error::HttpStatus {
                        status: resp.status().as_u16(),
                        url: url.to_string(),
                    });
                }
                Ok(resp.text().await?)
            }
        }
    }

    async fn open(&self, url: Url) -> Result<(), Error> {
        let html = self.load(&url).await?;
        tracing::debug!("Loaded {} ({} bytes)", url, html.len());
        let doc = Arc::new(Document { url, html });
        *self.lock_current() = Some(doc);
        Ok(())
    }

    fn document(&self) -> Result<Arc<Document>, Error> {
        self.lock_current()
            .clone()
            .ok_or_else(|| Error::Navigation("no page loaded".into()))
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Arc<Document>>> {
        self.shared
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn handles(&self, doc: &Arc<Document>, indices: Vec<usize>) -> Vec<StaticElement> {
        indices
            .into_iter()
            .map(|index| StaticElement {
                driver: self.clone(),
                doc: Arc::clone(doc),
                index,
            })
            .collect()
    }
}

#[async_trait]
impl Driver for StaticDriver {
    type Element = StaticElement;

    async fn goto(&self, url: &str) -> Result<(), Error> {
        let url = Url::parse(url)?;
        self.open(url).await
    }

    async fn current_url(&self) -> Result<String, Error> {
        Ok(self.document()?.url.to_string())
    }

    async fn ready_state(&self) -> Result<String, Error> {
        self.document()?;
        Ok("complete".to_string())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<StaticElement>, Error> {
        let doc = self.document()?;
        let indices = select(&doc.html, None, locator)?;
        Ok(self.handles(&doc, indices))
    }

    async fn set_implicit_wait(&self, _wait: Duration) -> Result<(), Error> {
        Ok(())
    }

    async fn quit(self) -> Result<(), Error> {
        *self.lock_current() = None;
        Ok(())
    }
}

/// An element of a static page, addressed by its position in document order.
#[derive(Clone)]
pub struct StaticElement {
    driver: StaticDriver,
    doc: Arc<Document>,
    index: usize,
}

impl fmt::Debug for StaticElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticElement")
            .field("url", &self.doc.url.as_str())
            .field("index", &self.index)
            .finish()
    }
}

impl StaticElement {
    fn with_element<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Result<T, Error> {
        let html = Html::parse_document(&self.doc.html);
        let el = elements(&html)
            .nth(self.index)
            .ok_or_else(|| Error::Command("element is no longer attached".into()))?;
        Ok(f(el))
    }
}

#[async_trait]
impl Element for StaticElement {
    async fn text(&self) -> Result<String, Error> {
        self.with_element(|el| collapse_whitespace(&el.text().collect::<String>()))
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, Error> {
        self.with_element(|el| el.value().attr(name).map(str::to_string))
    }

    async fn is_displayed(&self) -> Result<bool, Error> {
        self.with_element(|el| {
            std::iter::once(el)
                .chain(el.ancestors().filter_map(ElementRef::wrap))
                .all(|e| !is_hidden(e))
        })
    }

    async fn click(&self) -> Result<(), Error> {
        let (href, id) = self.with_element(|el| {
            (
                el.value().attr("href").map(str::to_string),
                el.value().attr("id").map(str::to_string),
            )
        })?;
        let Some(href) = href else {
            tracing::debug!("Click on a non-link element has no effect without scripts");
            return Ok(());
        };
        let target = match (href.trim(), id) {
            ("#" | "", Some(id)) => {
                let mut url = self.doc.url.clone();
                url.set_fragment(Some(&id));
                url
            }
            ("#" | "", None) => return Ok(()),
            (href, _) => self.doc.url.join(href)?,
        };
        self.driver.open(target).await
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, Error> {
        let indices = select(&self.doc.html, Some(self.index), locator)?;
        Ok(self.driver.handles(&self.doc, indices))
    }
}

fn elements(html: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

/// Document-order indices of the elements matching `locator`, searched under
/// the element at `scope` or the whole document.
fn select(source: &str, scope: Option<usize>, locator: &Locator) -> Result<Vec<usize>, Error> {
    let html = Html::parse_document(source);
    let order: HashMap<_, usize> = elements(&html)
        .enumerate()
        .map(|(i, el)| (el.id(), i))
        .collect();
    let root = match scope {
        Some(index) => elements(&html)
            .nth(index)
            .ok_or_else(|| Error::Command("element is no longer attached".into()))?,
        None => html.root_element(),
    };

    let matched: Vec<ElementRef<'_>> = match locator {
        Locator::Css(css) => {
            let selector = parse_selector(css)?;
            root.select(&selector).collect()
        }
        Locator::LinkText(text) => {
            let anchors = parse_selector("a")?;
            root.select(&anchors)
                .filter(|a| a.text().collect::<String>().contains(text.as_str()))
                .collect()
        }
    };

    Ok(matched
        .iter()
        .filter_map(|el| order.get(&el.id()).copied())
        .collect())
}

fn parse_selector(css: &str) -> Result<Selector, Error> {
    Selector::parse(css).map_err(|e| Error::InvalidLocator(format!("{}: {}", css, e)))
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    if value.name() == "input" && value.attr("type") == Some("hidden") {
        return true;
    }
    value
        .attr("style")
        .map(|style| {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase();
            compact.contains("display:none") || compact.contains("visibility:hidden")
        })
        .unwrap_or(false)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
