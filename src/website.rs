use std::time::Duration;

use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::http;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Elements dropped before any text is collected.
const NOISE_SELECTOR: &str = "script, style, nav, footer";

/// Download `url` and return its readable text, see [`extract_text`].
#[instrument(skip(client))]
pub async fn fetch_website_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let request = client
        .get(url)
        .timeout(FETCH_TIMEOUT)
        .header(reqwest::header::USER_AGENT, USER_AGENT);
    let body = http::send_text(request, url).await?;

    let text = extract_text(&body)?;
    debug!(chars = text.chars().count(), "extracted website text");
    Ok(text)
}

/// Readable text of an HTML page: the title, h1-h3 headings, paragraphs,
/// `main` and `article`, in that order, with whitespace collapsed.
///
/// Scripts, styles, navigation and footers are removed first. Text inside
/// `main` or `article` may therefore appear twice, once as paragraphs.
pub fn extract_text(html: &str) -> Result<String> {
    let mut document = Html::parse_document(html);

    let noise = Selector::parse(NOISE_SELECTOR)?;
    let noise_ids: Vec<_> = document.select(&noise).map(|el| el.id()).collect();
    for id in noise_ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let title = Selector::parse("title")?;
    let headings = Selector::parse("h1, h2, h3")?;
    let paragraphs = Selector::parse("p")?;
    let main = Selector::parse("main")?;
    let article = Selector::parse("article")?;

    // `Html::select` still visits detached nodes; walking from the root does not.
    let root = document.root_element();
    let concatenated = |selector: &Selector| -> String {
        root.select(selector)
            .flat_map(|el| el.text())
            .collect::<String>()
            .trim()
            .to_string()
    };
    let each_trimmed = |selector: &Selector| -> String {
        root.select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .join(" ")
    };

    let parts = [
        concatenated(&title),
        each_trimmed(&headings),
        each_trimmed(&paragraphs),
        concatenated(&main),
        concatenated(&article),
    ];

    Ok(parts
        .iter()
        .filter(|part| !part.is_empty())
        .join(" ")
        .split_whitespace()
        .join(" "))
}
