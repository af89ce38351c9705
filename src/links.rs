use crate::error::Result;
use crate::filter::LinkFilter;
use crate::normalize::normalize;
use crate::results::LinkMap;
use crate::session::{By, Element, Session};

/// Collects `href → text` for every element matching `by` on the loaded page
///
/// Elements without an `href` are skipped. A failure while scanning ends the
/// scan and the links gathered up to that point are returned.
pub async fn links_by_factor<S: Session>(
    session: &mut S,
    page_url: &str,
    by: &By,
    filter: &LinkFilter,
) -> LinkMap {
    let mut links = LinkMap::new();
    if let Err(e) = scan(session, page_url, by, filter, &mut links).await {
        ::log::debug!(
            "Link scan by {} on {} stopped after {} links: {}",
            by,
            page_url,
            links.len(),
            e
        );
    }
    links
}

async fn scan<S: Session>(
    session: &mut S,
    page_url: &str,
    by: &By,
    filter: &LinkFilter,
    links: &mut LinkMap,
) -> Result<()> {
    let elements = session.find_all(by).await?;

    for element in &elements {
        let href = match element.attribute("href").await? {
            Some(href) if !href.is_empty() => href,
            _ => continue,
        };
        let title = normalize(&element.text().await?);

        if !filter.accepts(page_url, &href, &title) {
            ::log::trace!("Link filter rejected: {}", href);
            continue;
        }
        links.insert(href, title);
    }

    Ok(())
}

/// Loads `url` and collects its links for each selector in turn
///
/// Links found by a later selector replace the title of the same URL found
/// by an earlier one. If the page cannot be loaded an error is logged and
/// no links are returned.
pub async fn get_links<S: Session>(
    session: &mut S,
    url: &str,
    filter: &LinkFilter,
    selectors: &[By],
) -> LinkMap {
    if let Err(e) = session.goto(url).await {
        ::log::error!("Failed to get links from {}: {}", url, e);
        return LinkMap::new();
    }

    let mut links = LinkMap::new();
    for by in selectors {
        links.merge(links_by_factor(session, url, by, filter).await);
    }

    ::log::info!("Found {} links in {}", links.len(), url);
    links
}
