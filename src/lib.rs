// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Order Link Extraction
//!
//! Scans a mailbox for purchase-confirmation emails, walks each message's
//! MIME tree to its HTML rendering and scrapes the links to individual order
//! detail pages.
//!
//! # Pieces
//!
//! - [`SearchPaginator`] follows search cursors until the service runs dry
//! - [`locate_html_body`] descends `multipart/mixed` → `multipart/alternative` → `text/html`
//! - [`decode_body`] undoes the service's web-safe base64
//! - [`OrderLinkExtractor`] collects anchors that follow the greeting block
//! - [`Pipeline`] ties them together under a [`FailurePolicy`]
//!
//! Authentication and the mail service transport are supplied by the caller
//! through [`MessageSearch`] and [`MessageSource`].
//!
//! # Example
//!
//! ```rust
//! use order_links::{extract_order_links, OrderLink};
//!
//! let html = r#"<div class="greeting">Hello</div><a href="https://shop/order/1">1</a>"#;
//! assert_eq!(extract_order_links(html), vec![OrderLink::new("https://shop/order/1")]);
//! ```

mod config;
mod decode;
mod error;
mod extractor;
mod locator;
mod paginator;
mod pipeline;
mod types;

pub use config::{DEFAULT_QUERY, FailurePolicy, PipelineConfig};
pub use decode::{decode_body, decode_part, encode_body};
pub use error::{ExtractError, Result, ShapeStep};
pub use extractor::{GreetingMarker, OrderLinkExtractor, extract_order_links};
pub use locator::{
    MULTIPART_ALTERNATIVE, MULTIPART_MIXED, TEXT_HTML, expect_mixed_root, find_alternative,
    find_html, locate_html_body,
};
pub use paginator::{MessageSearch, SearchPaginator, for_each_match};
pub use pipeline::{
    LinkSink, LogSink, MessageFailure, MessageSource, Pipeline, RunReport, process_message,
};
pub use types::*;
