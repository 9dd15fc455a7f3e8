// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use url::Url;

use crate::{FilterKind, LinkId, Page, PageLink, TableId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Let the browser follow the link untouched.
    Default(String),
    Rewritten(Url),
}

/// First table of the link's nearest enclosing section.
pub fn governing_table<'a>(page: &'a Page, link: &PageLink) -> Option<&'a TableId> {
    let section = page.section(link.section.as_ref()?)?;
    section.tables.first().filter(|table| !table.is_empty())
}

/// Works like `URLSearchParams::set`: the first `key` pair takes the new
/// value, later duplicates are dropped, and a missing key is appended.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    match pairs.iter().position(|(name, _)| name == key) {
        Some(first) => {
            pairs[first].1 = value.to_owned();
            let mut index = 0;
            pairs.retain(|(name, _)| {
                let keep = index <= first || name != key;
                index += 1;
                keep
            });
        }
        None => pairs.push((key.to_owned(), value.to_owned())),
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// `None` when the link is not on the page.
pub fn carry_filters(page: &Page, link: &LinkId) -> Option<LinkTarget> {
    let link = page.link(link)?;
    let Some(table) = governing_table(page, link) else {
        return Some(LinkTarget::Default(link.href.clone()));
    };
    let mut url = match page.location.join(&link.href) {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(href = %link.href, %error, "pagination link is not a valid URL");
            return Some(LinkTarget::Default(link.href.clone()));
        }
    };

    for kind in FilterKind::ALL {
        if let Some(control) = page.control_for(kind, table)
            && !control.value.is_empty()
        {
            set_query_param(&mut url, kind.query_param(), &control.value);
        }
    }
    tracing::debug!(%table, %url, "carrying filters across pagination");
    Some(LinkTarget::Rewritten(url))
}
