//! Recruitee API
//!
//! Offers annotated with their recruiter's email, and candidates whose
//! placements carry the pipeline stage name and whose notes are attached.

use super::{keyed_summaries, record_ids, RunReport, VendorContext, VendorProfile};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::Credentials;
use crate::error::Result;
use crate::harvest::KeyedHarvest;
use crate::http::RateLimiterConfig;
use crate::join::{attach_field, attach_nested, LookupIndex};
use crate::pagination::{ResourceDescriptor, StopCondition};
use crate::template::{render, TemplateContext};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the bearer token
pub const API_KEY_VAR: &str = "RECRUITEE_API_KEY";
/// Environment variable holding the company id in the API path
pub const COMPANY_ID_VAR: &str = "RECRUITEE_API_COMPANY_ID";

/// Recruitee defaults. The base URL is rendered with the company id.
pub fn profile() -> VendorProfile {
    VendorProfile {
        concurrency: 5,
        rate_limit: Some(RateLimiterConfig::new(Duration::from_millis(200), 5)),
        ..VendorProfile::new("recruitee", "https://api.recruitee.com/c/{{ company_id }}")
    }
}

/// Harvest offers, candidates and candidate notes
pub async fn run(ctx: &VendorContext, credentials: &Credentials) -> Result<RunReport> {
    let auth = Arc::new(Authenticator::new(AuthConfig::bearer(
        credentials.require(API_KEY_VAR)?,
    )));
    let company = TemplateContext::new().with("company_id", credentials.require(COMPANY_ID_VAR)?);
    let base_url = render(&ctx.base_url, &company)?;
    let mut report = RunReport::default();

    let single = |path: &str, records: &str| {
        ResourceDescriptor::new(&base_url, path)
            .auth(Arc::clone(&auth))
            .records_path(records)
            .stop_condition(StopCondition::single())
    };

    let mut offers = ctx.harvest(&single("offers", "offers")).await?;
    attach_recruiter_emails(&mut offers.records);
    report.push(
        ctx.persist(
            "recruitee_jobs.json",
            &Value::Array(offers.records.clone()),
            vec![offers.summary()],
        )
        .await?,
    );

    let mut candidates = ctx.harvest(&single("candidates", "candidates")).await?;
    let stages =
        LookupIndex::build_nested(&offers.records, "pipeline_template.stages", "id", "name");
    attach_nested(&mut candidates.records, "placements", "stage_id", &stages, "stage_name");

    let notes = ctx
        .harvest_keyed(record_ids(&candidates.records, "candidate"), |candidate_id| {
            let vars = company.clone().with("candidate_id", candidate_id.clone());
            let path = "candidates/{{ candidate_id }}/notes";
            Ok(ResourceDescriptor::templated(&base_url, path, &vars)?
                .name(format!("candidate {candidate_id} notes"))
                .auth(Arc::clone(&auth))
                .records_path("notes")
                .stop_condition(StopCondition::single()))
        })
        .await?;
    attach_notes(&mut candidates.records, &notes);

    let mut sources = vec![offers.summary(), candidates.summary()];
    sources.extend(keyed_summaries(&notes));
    report.push(
        ctx.persist(
            "recruitee_candidates.json",
            &Value::Array(candidates.records),
            sources,
        )
        .await?,
    );

    Ok(report)
}

/// Set `recruiterEmail` on each offer from its own followers
pub fn attach_recruiter_emails(offers: &mut [Value]) {
    for offer in offers.iter_mut() {
        let followers = LookupIndex::build(
            offer
                .get("followers")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            "id",
            "email",
        );
        attach_field(std::slice::from_mut(offer), "recruiter_id", &followers, "recruiterEmail");
    }
}

/// Set `notes` on each candidate, `null` where the notes harvest failed
pub fn attach_notes(candidates: &mut [Value], notes: &[KeyedHarvest<Value>]) {
    let by_candidate: Vec<Value> = notes
        .iter()
        .filter(|keyed| keyed.result.is_complete())
        .map(|keyed| json!({ "id": keyed.key, "notes": keyed.result.records }))
        .collect();
    let index = LookupIndex::build(&by_candidate, "id", "notes");
    attach_field(candidates, "id", &index, "notes");
}
