use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Starter,
    Growth,
    Pro,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Starter => "STARTER",
            Tier::Growth => "GROWTH",
            Tier::Pro => "PRO",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STARTER" => Ok(Tier::Starter),
            "GROWTH" => Ok(Tier::Growth),
            "PRO" => Ok(Tier::Pro),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stripe price ids per tier; a tier without a configured price cannot be sold.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    pub starter: Option<String>,
    pub growth: Option<String>,
    pub pro: Option<String>,
}

impl PriceTable {
    pub fn price_for(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Starter => self.starter.as_deref(),
            Tier::Growth => self.growth.as_deref(),
            Tier::Pro => self.pro.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub tier: Tier,
    pub price_id: String,
    /// Site origin the success and cancel URLs are built on.
    pub origin: String,
}

impl CheckoutRequest {
    pub fn success_url(&self) -> String {
        format!("{}/pricing/success?tier={}", self.origin, self.tier)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/pricing?canceled=1", self.origin)
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}
