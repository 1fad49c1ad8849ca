//! Extraction of raw offer rows from the listing page HTML.
//!
//! The page renders one `<a class="lms-row">` anchor per offer, with the
//! departure label and destination in dedicated divs and the price in a
//! `current-price` paragraph. Scanning stays local to each row block;
//! fields are entity-decoded, tag-stripped and whitespace-collapsed but
//! otherwise kept verbatim. Shape checks only — a row missing a mandatory
//! field is skipped with a debug log, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// One offer row as found in the page, fields still free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListingRow {
    /// Combined date/time label, e.g. `"10-05-2025 · 07:00"`.
    pub date_label: String,
    pub destination: String,
    /// E.g. `"499 €"`; parsed downstream by the normalizer.
    pub price_text: String,
    pub link: String,
    /// Limited-availability text, verbatim, when the row carries one.
    pub urgency_text: Option<String>,
}

static RE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b[^>]*class="[^"]*\blms-row\b[^"]*"[^>]*>.*?</a>"#).unwrap());
static RE_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bhref="([^"]*)""#).unwrap());
static RE_DEPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div[^>]*\bdeparty\b[^>]*>(.*?)</div>"#).unwrap());
static RE_DESTINY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div[^>]*\bdestiny\b[^>]*>(.*?)</div>"#).unwrap());
static RE_PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<p[^>]*\bcurrent-price\b[^>]*>(.*?)</p>"#).unwrap());
static RE_URGENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<p[^>]*\burgency\b[^>]*>(.*?)</p>"#).unwrap());
static RE_P: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Decode entities, strip tags, collapse whitespace, trim.
fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    RE_WS.replace_all(&stripped, " ").trim().to_string()
}

/// Second `<p>` of a named div block — the label paragraphs sit under a
/// caption paragraph in both the departure and destination divs.
fn second_paragraph(block: &str, div_re: &Regex) -> Option<String> {
    let inner = div_re.captures(block)?.get(1)?.as_str();
    let text = RE_P
        .captures_iter(inner)
        .nth(1)
        .map(|c| clean_text(c.get(1).map_or("", |m| m.as_str())))?;
    (!text.is_empty()).then_some(text)
}

fn price_text(block: &str) -> Option<String> {
    let text = clean_text(RE_PRICE.captures(block)?.get(1)?.as_str());
    (!text.is_empty()).then_some(text)
}

fn urgency_text(block: &str) -> Option<String> {
    RE_URGENCY
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
}

/// Pull all offer rows out of a listing page. Rows with a missing date,
/// destination, or price field are skipped.
pub fn parse_listing(html: &str) -> Vec<RawListingRow> {
    let mut rows = Vec::new();
    for m in RE_ROW.find_iter(html) {
        let block = m.as_str();
        let date_label = second_paragraph(block, &RE_DEPARTY);
        let destination = second_paragraph(block, &RE_DESTINY);
        let price = price_text(block);
        match (date_label, destination, price) {
            (Some(date_label), Some(destination), Some(price_text)) => {
                rows.push(RawListingRow {
                    date_label,
                    destination,
                    price_text,
                    link: RE_HREF
                        .captures(block)
                        .and_then(|c| c.get(1))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                    urgency_text: urgency_text(block),
                });
            }
            _ => {
                tracing::debug!("skipping listing row with missing fields");
            }
        }
    }
    rows
}
