//! Order link extraction from rendered confirmation emails
//!
//! Order links sit as siblings right after a fixed greeting block in the
//! sender's template. The selector is a structural fingerprint of that
//! template and stops matching if the template changes.

use crate::error::{ExtractError, Result};
use crate::types::OrderLink;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

static ELEMENT_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());

static CLASS_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").unwrap());

static DEFAULT_SELECTOR: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| Selector::parse("div.greeting ~ a").unwrap());

/// The element that precedes the order links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingMarker {
    /// Tag name of the marker, e.g. `div`
    pub element: String,

    /// Class carried by the marker, e.g. `greeting`
    pub class: String,
}

impl Default for GreetingMarker {
    fn default() -> Self {
        Self {
            element: "div".into(),
            class: "greeting".into(),
        }
    }
}

impl GreetingMarker {
    pub fn new(element: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            class: class.into(),
        }
    }

    /// Selector for anchors that follow the marker under the same parent
    pub fn sibling_anchor_selector(&self) -> Result<String> {
        if !ELEMENT_REGEX.is_match(&self.element) {
            return Err(ExtractError::Config(format!(
                "marker element {:?} is not a tag name",
                self.element
            )));
        }
        if !CLASS_REGEX.is_match(&self.class) {
            return Err(ExtractError::Config(format!(
                "marker class {:?} is not a class name",
                self.class
            )));
        }

        Ok(format!("{}.{} ~ a", self.element, self.class))
    }
}

/// Scrapes order links out of decoded HTML
#[derive(Debug, Clone)]
pub struct OrderLinkExtractor {
    selector: Selector,
}

impl Default for OrderLinkExtractor {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.clone(),
        }
    }
}

impl OrderLinkExtractor {
    pub fn new(marker: &GreetingMarker) -> Result<Self> {
        let css = marker.sibling_anchor_selector()?;
        let selector = Selector::parse(&css)
            .map_err(|e| ExtractError::Config(format!("selector {css:?}: {e:?}")))?;

        Ok(Self { selector })
    }

    /// Extract the `href` of every anchor following the marker, in document
    /// order. Anchors without an `href` are skipped. Never fails: malformed
    /// markup yields whatever the permissive parser recovers.
    #[must_use]
    pub fn extract(&self, html: &str) -> Vec<OrderLink> {
        let document = Html::parse_document(html);

        let links: Vec<OrderLink> = document
            .select(&self.selector)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(OrderLink::new)
            .collect();

        debug!("Extracted {} order links", links.len());
        links
    }
}

/// Extract order links using the default `div.greeting` marker
#[must_use]
pub fn extract_order_links(html: &str) -> Vec<OrderLink> {
    OrderLinkExtractor::default().extract(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marker_builds_default_selector() {
        let css = GreetingMarker::default().sibling_anchor_selector().unwrap();
        assert_eq!(css, "div.greeting ~ a");
    }

    #[test]
    fn marker_rejects_selector_syntax() {
        let marker = GreetingMarker::new("div", "greeting ~ p");
        assert!(matches!(
            marker.sibling_anchor_selector(),
            Err(ExtractError::Config(_))
        ));

        let marker = GreetingMarker::new("div > span", "greeting");
        assert!(marker.sibling_anchor_selector().is_err());
    }
}
