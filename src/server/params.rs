use serde::Deserialize;

use crate::email::KeywordRank;
use crate::rank::RankQuery;

const DEFAULT_COUNTRY: &str = "us";
const DEFAULT_LANGUAGE: &str = "en";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankCheckParams {
    /// Search phrase to look up, e.g. "plumber near me"
    pub keyword: Option<String>,
    /// Domain whose rank is wanted; subdomains count as a match
    pub domain: Option<String>,
    /// SerpApi location, e.g. "San Francisco, California, United States"
    pub location: Option<String>,
    #[serde(alias = "gl")]
    pub country_code: Option<String>,
    #[serde(alias = "hl")]
    pub language_code: Option<String>,
    /// Also look for the domain among map listings
    pub include_local_pack: Option<bool>,
}

impl RankCheckParams {
    /// `None` when `keyword` or `domain` is missing or blank.
    pub fn into_query(self) -> Option<RankQuery> {
        Some(RankQuery {
            keyword: non_blank(self.keyword)?,
            domain: non_blank(self.domain)?,
            location: non_blank(self.location),
            country_code: non_blank(self.country_code)
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            language_code: non_blank(self.language_code)
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            include_local_pack: self.include_local_pack.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftPostParams {
    pub business: Option<String>,
    pub topic: Option<String>,
}

impl DraftPostParams {
    pub fn required(self) -> Option<(String, String)> {
        Some((non_blank(self.business)?, non_blank(self.topic)?))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftReplyParams {
    pub business: Option<String>,
    pub review_text: Option<String>,
}

impl DraftReplyParams {
    pub fn required(self) -> Option<(String, String)> {
        Some((non_blank(self.business)?, non_blank(self.review_text)?))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutParams {
    /// "STARTER", "GROWTH" or "PRO"
    pub tier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSendParams {
    pub to_email: Option<String>,
    pub business_name: Option<String>,
    pub month_label: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub keywords: Option<Vec<KeywordRank>>,
}

pub struct ReportSend {
    pub to_email: String,
    pub business_name: String,
    pub month_label: String,
    pub highlights: Vec<String>,
    pub keywords: Vec<KeywordRank>,
}

impl ReportSendParams {
    pub fn required(self) -> Option<ReportSend> {
        Some(ReportSend {
            to_email: non_blank(self.to_email)?,
            business_name: non_blank(self.business_name)?,
            month_label: non_blank(self.month_label)?,
            highlights: self.highlights.unwrap_or_default(),
            keywords: self.keywords.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportTestQuery {
    pub to: Option<String>,
}

impl ReportTestQuery {
    pub fn recipient(self) -> Option<String> {
        non_blank(self.to)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchQuery {
    pub key: Option<String>,
}
