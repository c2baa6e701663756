//! Bizneo ATS
//!
//! Recruiters and jobs of the account's first company, jobs annotated with
//! their owner's email, and every job's candidates.

use super::{keyed_summaries, record_ids, RunReport, VendorContext, VendorProfile};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::Credentials;
use crate::error::Result;
use crate::harvest::KeyedHarvest;
use crate::join::{attach_field, LookupIndex};
use crate::pagination::{ResourceDescriptor, StopCondition};
use crate::template::TemplateContext;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Environment variable holding the API token
pub const API_KEY_VAR: &str = "BIZNEO_API_KEY";
/// Environment variable holding the API user's email
pub const API_EMAIL_VAR: &str = "BIZNEO_API_EMAIL";

/// Bizneo defaults
pub fn profile() -> VendorProfile {
    VendorProfile {
        concurrency: 4,
        ..VendorProfile::new("bizneo", "https://ats.bizneo.com/api/v3")
    }
}

/// Bizneo token auth header
pub fn auth_config(api_key: &str, email: &str) -> AuthConfig {
    AuthConfig::header(
        "Authorization",
        format!("Token token={api_key}, user_email={email}"),
    )
}

/// Harvest recruiters, jobs and applications
pub async fn run(ctx: &VendorContext, credentials: &Credentials) -> Result<RunReport> {
    let auth = Arc::new(Authenticator::new(auth_config(
        &credentials.require(API_KEY_VAR)?,
        &credentials.require(API_EMAIL_VAR)?,
    )));
    let mut report = RunReport::default();

    let companies = ctx
        .harvest(
            &ctx.descriptor("users/companies")
                .name("companies")
                .auth(Arc::clone(&auth))
                .records_path("companies")
                .stop_condition(StopCondition::single()),
        )
        .await?
        .require_complete()?;

    let Some(company_id) = first_company_id(&companies.records) else {
        info!("No companies found, nothing to harvest");
        return Ok(report);
    };
    let company = TemplateContext::new().with("company_id", company_id);

    let recruiters = ctx
        .harvest(
            &collection(ctx, "companies/{{ company_id }}/recruiters", &company)?
                .name("recruiters")
                .auth(Arc::clone(&auth))
                .records_path("recruiters"),
        )
        .await?;

    let mut jobs = ctx
        .harvest(
            &collection(ctx, "companies/{{ company_id }}/jobs", &company)?
                .name("jobs")
                .auth(Arc::clone(&auth))
                .records_path("jobs"),
        )
        .await?;

    let owners = LookupIndex::build(&recruiters.records, "id", "email");
    attach_field(&mut jobs.records, "owner_id", &owners, "owner_email");

    report.push(
        ctx.persist(
            "bizneo_recruiters.json",
            &Value::Array(recruiters.records.clone()),
            vec![recruiters.summary()],
        )
        .await?,
    );
    report.push(
        ctx.persist(
            "bizneo_jobs.json",
            &Value::Array(jobs.records.clone()),
            vec![jobs.summary()],
        )
        .await?,
    );

    let job_ids = record_ids(&jobs.records, "job");
    if job_ids.is_empty() {
        return Ok(report);
    }

    let applications = ctx
        .harvest_keyed(job_ids, |job_id| {
            let path_ctx = company.clone().with("job_id", job_id.clone());
            let path = "companies/{{ company_id }}/jobs/{{ job_id }}/candidates";
            Ok(collection(ctx, path, &path_ctx)?
                .name(format!("job {job_id} candidates"))
                .auth(Arc::clone(&auth))
                .records_path("candidates"))
        })
        .await?;

    report.push(
        ctx.persist(
            "bizneo_applications.json",
            &applications_document(&applications),
            keyed_summaries(&applications),
        )
        .await?,
    );

    Ok(report)
}

fn collection(
    ctx: &VendorContext,
    path: &str,
    vars: &TemplateContext,
) -> Result<ResourceDescriptor> {
    ResourceDescriptor::templated(&ctx.base_url, path, vars)
}

/// Id of the first company in the list
pub fn first_company_id(companies: &[Value]) -> Option<Value> {
    companies
        .first()
        .and_then(|company| company.get("id"))
        .filter(|id| !id.is_null())
        .cloned()
}

/// `[{jobId, completed, applications}]`, one entry per job
pub fn applications_document(results: &[KeyedHarvest<Value>]) -> Value {
    Value::Array(
        results
            .iter()
            .map(|keyed| {
                json!({
                    "jobId": keyed.key,
                    "completed": keyed.result.completed,
                    "applications": keyed.result.records,
                })
            })
            .collect(),
    )
}
