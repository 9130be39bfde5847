use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::channel::ChannelId;
use crate::http::fetch_text;

use super::patterns::{extend_channels, extract_channels};

pub const SCAN_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches seed pages and collects the channels they reference.
#[derive(Clone)]
pub struct PageScanner {
    client: Client,
}

impl PageScanner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /**
        Scan a page for channel identifiers.

        Any fetch failure is logged and produces an empty set; a bad seed
        URL never aborts discovery.
    */
    pub async fn scan(&self, url: &str) -> BTreeSet<ChannelId> {
        tracing::info!(url, "scanning page");

        let body = match fetch_text(&self.client, url, SCAN_TIMEOUT).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url, error = %e, "page scan failed");
                return BTreeSet::new();
            }
        };

        let found = extract_from_html(&body);
        tracing::info!(url, count = found.len(), "page scan finished");
        found
    }
}

// ── Surfaces ─────────────────────────────────────────────────────────────────

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector should parse"))
}

fn iframe_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "iframe[src]")
}

fn script_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "script")
}

fn anchor_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "a[href]")
}

/**
    Extract channels from an HTML document.

    Four surfaces are scanned independently and unioned: the document
    text, iframe `src` attributes, script bodies (and `src`), and anchor
    `href` attributes. Embed URLs and script-injected data often never
    appear in the visible text.
*/
pub fn extract_from_html(html: &str) -> BTreeSet<ChannelId> {
    let document = Html::parse_document(html);

    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    let mut found = extract_channels(&text);

    for src in iframe_sources(&document) {
        extend_channels(&mut found, src);
    }

    for script in script_contents(&document) {
        extend_channels(&mut found, &script);
    }

    for href in anchor_targets(&document) {
        extend_channels(&mut found, href);
    }

    found
}

fn iframe_sources(document: &Html) -> impl Iterator<Item = &str> {
    document
        .select(iframe_selector())
        .filter_map(|el| el.value().attr("src"))
}

fn script_contents(document: &Html) -> impl Iterator<Item = String> + '_ {
    document.select(script_selector()).map(|el| {
        let mut content = el.text().collect::<String>();
        if let Some(src) = el.value().attr("src") {
            content.push(' ');
            content.push_str(src);
        }
        content
    })
}

fn anchor_targets(document: &Html) -> impl Iterator<Item = &str> {
    document
        .select(anchor_selector())
        .filter_map(|el| el.value().attr("href"))
}
