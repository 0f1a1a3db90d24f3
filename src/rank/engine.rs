use tracing::info;

use super::{RankOutcome, RankQuery, extract};
use crate::serp::{SerpError, SerpRequest, SerpSource};

#[derive(Debug)]
pub struct RankReport {
    pub outcome: RankOutcome,
    pub organic_count: usize,
}

/// Fetches one results page for the query and locates the query's domain in it.
pub async fn check_rank(
    serp: &impl SerpSource,
    query: &RankQuery,
) -> Result<RankReport, SerpError> {
    let response = serp.search(&SerpRequest::from(query)).await?;

    let organic = response.organic_results.unwrap_or_default();
    let local_pack = response.local_results.unwrap_or_default();

    let outcome = extract(&organic, &local_pack, &query.domain, query.include_local_pack);

    info!(
        keyword = %query.keyword,
        domain = %query.domain,
        position = ?outcome.position,
        organic = organic.len(),
        "rank check complete"
    );

    Ok(RankReport {
        outcome,
        organic_count: organic.len(),
    })
}
