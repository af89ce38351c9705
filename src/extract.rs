use crate::error::Result;
use crate::normalize::normalize;
use crate::results::ExtractedPage;
use crate::session::{By, Element, Session};
use std::collections::BTreeSet;

/// Loads `url` and extracts its metadata and text
///
/// Each field is read independently; a field whose query fails is left
/// out of the record and the remaining fields are still read. A failed
/// navigation is ignored and the fields are read from whatever page the
/// session shows.
pub async fn extract<S: Session>(session: &mut S, url: &str) -> ExtractedPage {
    ::log::debug!("Extracting text from: {}", url);

    if let Err(e) = session.goto(url).await {
        ::log::debug!("Navigation to {} failed, reading current page: {}", url, e);
    }

    let mut page = ExtractedPage::new(url);
    page.title = optional("title", url, title(session).await);
    page.description =
        optional("description", url, meta_content(session, "description").await).flatten();
    page.keywords =
        optional("keywords", url, meta_content(session, "keywords").await).flatten();
    page.anchor_texts = optional("anchor texts", url, anchor_texts(session).await);
    page.image_texts = optional("image texts", url, image_texts(session).await);
    page.body = optional("body", url, body_text(session).await);

    page
}

fn optional<T>(field: &str, url: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            ::log::debug!("No {} for {}: {}", field, url, e);
            None
        }
    }
}

async fn title<S: Session>(session: &mut S) -> Result<String> {
    Ok(normalize(&session.title().await?))
}

/// `content` of `meta[name="<name>"]`, `None` when the tag has no content
async fn meta_content<S: Session>(session: &mut S, name: &str) -> Result<Option<String>> {
    let selector = By::Css(format!("meta[name=\"{name}\"]"));
    let meta = session.find(&selector).await?;
    Ok(meta.attribute("content").await?.map(|content| normalize(&content)))
}

/// Text of every anchor; an element that cannot be read ends the scan
async fn anchor_texts<S: Session>(session: &mut S) -> Result<BTreeSet<String>> {
    let anchors = session.find_all(&By::tag("a")).await?;

    let mut texts = BTreeSet::new();
    for anchor in &anchors {
        match anchor.text().await {
            Ok(text) => {
                texts.insert(normalize(&text));
            }
            Err(e) => {
                ::log::debug!("Stopped reading anchor texts: {}", e);
                break;
            }
        }
    }
    Ok(texts)
}

/// Alt text and rendered text of every image; an element that cannot be
/// read ends the scan
async fn image_texts<S: Session>(session: &mut S) -> Result<BTreeSet<String>> {
    let images = session.find_all(&By::tag("img")).await?;

    let mut texts = BTreeSet::new();
    for image in &images {
        if let Err(e) = collect_image_text(image, &mut texts).await {
            ::log::debug!("Stopped reading image texts: {}", e);
            break;
        }
    }
    Ok(texts)
}

async fn collect_image_text<E: Element>(image: &E, texts: &mut BTreeSet<String>) -> Result<()> {
    if let Some(alt) = image.attribute("alt").await? {
        if !alt.is_empty() {
            texts.insert(normalize(&alt));
        }
    }

    let text = normalize(&image.text().await?);
    if !text.is_empty() {
        texts.insert(text);
    }
    Ok(())
}

async fn body_text<S: Session>(session: &mut S) -> Result<String> {
    let body = session.find(&By::tag("body")).await?;
    Ok(normalize(&body.text().await?))
}
