//! Greenhouse Harvest API
//!
//! Every application, or every candidate reduced to their LinkedIn links.

use super::{RunReport, VendorContext, VendorProfile};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::Credentials;
use crate::error::Result;
use serde_json::{json, Value};
use std::sync::Arc;

/// Environment variable holding the Harvest API key
pub const API_KEY_VAR: &str = "GREENHOUSE_API_KEY";

const CANDIDATES_PAGE_SIZE: u32 = 100;

/// Which collection to harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// All applications → `greenhouse_applicants.json`
    Applications,
    /// LinkedIn links of all candidates → `greenhouse_linkedin_info.json`
    Linkedin,
}

/// Greenhouse defaults
pub fn profile() -> VendorProfile {
    VendorProfile::new("greenhouse", "https://harvest.greenhouse.io/v1")
}

/// Harvest one Greenhouse collection
pub async fn run(
    ctx: &VendorContext,
    credentials: &Credentials,
    resource: Resource,
) -> Result<RunReport> {
    let auth = Arc::new(Authenticator::new(AuthConfig::basic_api_key(
        credentials.require(API_KEY_VAR)?,
    )));
    let mut report = RunReport::default();

    match resource {
        Resource::Applications => {
            let applications = ctx
                .harvest(&ctx.descriptor("applications").auth(auth))
                .await?;
            report.push(
                ctx.persist(
                    "greenhouse_applicants.json",
                    &Value::Array(applications.records.clone()),
                    vec![applications.summary()],
                )
                .await?,
            );
        }
        Resource::Linkedin => {
            let candidates = ctx
                .harvest(
                    &ctx.descriptor("candidates")
                        .auth(auth)
                        .page_size("per_page", ctx.page_size(CANDIDATES_PAGE_SIZE)),
                )
                .await?;
            let linkedin: Vec<Value> = candidates.records.iter().map(linkedin_info).collect();
            report.push(
                ctx.persist(
                    "greenhouse_linkedin_info.json",
                    &Value::Array(linkedin),
                    vec![candidates.summary()],
                )
                .await?,
            );
        }
    }

    Ok(report)
}

/// Reduce a candidate to its name and the addresses pointing at linkedin.com
pub fn linkedin_info(candidate: &Value) -> Value {
    json!({
        "id": candidate["id"],
        "first_name": candidate["first_name"],
        "last_name": candidate["last_name"],
        "website_addresses": linkedin_addresses(&candidate["website_addresses"]),
        "social_media_addresses": linkedin_addresses(&candidate["social_media_addresses"]),
    })
}

fn linkedin_addresses(addresses: &Value) -> Vec<Value> {
    addresses
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|address| address.get("value").and_then(Value::as_str))
        .filter(|value| value.contains("linkedin.com"))
        .map(|value| json!({ "value": value }))
        .collect()
}
