//! Rank extraction: locate a domain within rank-ordered search results.
//!
//! Everything here is pure and synchronous. Fetching the results is the job of
//! [`engine::check_rank`] and the SERP client behind it.

pub(crate) mod engine;
mod types;

pub use types::{LocalPackResult, Placement, RankMatch, RankOutcome, RankQuery, SearchResult};

use std::borrow::Cow;

use url::Url;

const TOP3: usize = 3;
const TOP10: usize = 10;

/// Reduces a URL or bare hostname to a comparable host.
///
/// Lower-cases and drops a leading `www.`. Input that does not parse as a URL
/// is used verbatim as the host, so this never fails.
pub fn normalize_host(input: &str) -> String {
    let trimmed = input.trim();
    let has_scheme = trimmed
        .get(..4)
        .is_some_and(|p| p.eq_ignore_ascii_case("http"));
    let candidate = if has_scheme {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };

    let host = Url::parse(&candidate)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| trimmed.to_string())
        .to_lowercase();

    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// True when `candidate` is `target` or a subdomain of it (never the reverse).
pub fn same_domain(candidate: &str, target: &str) -> bool {
    let candidate = normalize_host(candidate);
    let target = normalize_host(target);
    if candidate.is_empty() || target.is_empty() {
        return false;
    }
    candidate == target
        || candidate
            .strip_suffix(target.as_str())
            .is_some_and(|head| head.ends_with('.'))
}

/// First entry, in list order, whose link belongs to `target`.
pub fn find_rank<'a>(results: &'a [SearchResult], target: &str) -> Option<RankMatch<'a>> {
    results
        .iter()
        .filter(|r| !r.link.trim().is_empty())
        .find(|r| same_domain(&r.link, target))
        .map(|r| RankMatch {
            position: r.position,
            link: &r.link,
        })
}

pub fn summarize_top(results: &[SearchResult], n: usize) -> &[SearchResult] {
    &results[..results.len().min(n)]
}

pub fn classify(position: Option<u32>) -> Placement {
    match position {
        Some(p) => Placement {
            in_top3: p <= 3,
            in_top10: p <= 10,
        },
        None => Placement::default(),
    }
}

/// First local-pack listing whose website belongs to `target`.
pub fn find_local_pack<'a>(
    places: &'a [LocalPackResult],
    target: &str,
) -> Option<&'a LocalPackResult> {
    places.iter().find(|p| {
        p.website
            .as_deref()
            .is_some_and(|site| !site.trim().is_empty() && same_domain(site, target))
    })
}

pub fn extract(
    organic: &[SearchResult],
    local_pack: &[LocalPackResult],
    target: &str,
    include_local_pack: bool,
) -> RankOutcome {
    let hit = find_rank(organic, target);
    let position = hit.map(|h| h.position);
    let placement = classify(position);

    RankOutcome {
        position,
        matched_link: hit.map(|h| h.link.to_string()),
        in_top3: placement.in_top3,
        in_top10: placement.in_top10,
        top3: summarize_top(organic, TOP3).to_vec(),
        top10: summarize_top(organic, TOP10).to_vec(),
        local_pack_match: include_local_pack
            .then(|| find_local_pack(local_pack, target).cloned()),
    }
}
