//! Gupy public API
//!
//! Job and email templates, or every job together with its applications.
//! Gupy lists declare `totalPages`, which ends each walk.

use super::{keyed_summaries, RunReport, VendorContext, VendorProfile};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::Credentials;
use crate::error::Result;
use crate::harvest::KeyedHarvest;
use crate::pagination::{ResourceDescriptor, StopCondition};
use crate::template::TemplateContext;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

/// Environment variable holding the bearer token
pub const API_KEY_VAR: &str = "GUPY_API_KEY";

/// Which templates to harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// `job-templates`, requested with every field
    Jobs,
    /// `email-templates`
    Emails,
}

impl TemplateKind {
    /// API path of the template list
    pub fn path(self) -> &'static str {
        match self {
            Self::Jobs => "job-templates",
            Self::Emails => "email-templates",
        }
    }

    /// Output file name
    pub fn file_name(self) -> String {
        format!("gupy-{}.json", self.path())
    }
}

/// Gupy defaults
pub fn profile() -> VendorProfile {
    VendorProfile {
        concurrency: 4,
        ..VendorProfile::new("gupy", "https://api.gupy.io/api/v1")
    }
}

fn authenticator(credentials: &Credentials) -> Result<Arc<Authenticator>> {
    Ok(Arc::new(Authenticator::new(AuthConfig::bearer(
        credentials.require(API_KEY_VAR)?,
    ))))
}

/// Gupy list: records under `results`, ended by `totalPages`
fn paged(descriptor: ResourceDescriptor, auth: &Arc<Authenticator>) -> ResourceDescriptor {
    descriptor
        .auth(Arc::clone(auth))
        .records_path("results")
        .stop_condition(StopCondition::total_pages("totalPages"))
}

/// Harvest one kind of template
pub async fn run_templates(
    ctx: &VendorContext,
    credentials: &Credentials,
    kind: TemplateKind,
) -> Result<RunReport> {
    let auth = authenticator(credentials)?;
    let mut descriptor = paged(ctx.descriptor(kind.path()), &auth);
    if kind == TemplateKind::Jobs {
        descriptor = descriptor.query("fields", "all");
    }

    let templates = ctx.harvest(&descriptor).await?;

    let mut report = RunReport::default();
    report.push(
        ctx.persist(
            &kind.file_name(),
            &Value::Array(templates.records.clone()),
            vec![templates.summary()],
        )
        .await?,
    );
    Ok(report)
}

/// Harvest every job and the applications of each
pub async fn run_applications(ctx: &VendorContext, credentials: &Credentials) -> Result<RunReport> {
    let auth = authenticator(credentials)?;

    let jobs = ctx.harvest(&paged(ctx.descriptor("jobs"), &auth)).await?;

    let keyed_jobs: Vec<Value> = jobs
        .records
        .iter()
        .filter(|job| {
            let has_id = job.get("id").is_some_and(|id| !id.is_null());
            if !has_id {
                warn!("Skipping job without an id");
            }
            has_id
        })
        .cloned()
        .collect();

    let applications = ctx
        .harvest_keyed(keyed_jobs, |job| {
            let vars = TemplateContext::new().with("job_id", job["id"].clone());
            let path = "jobs/{{ job_id }}/applications";
            let descriptor = ResourceDescriptor::templated(&ctx.base_url, path, &vars)?;
            Ok(paged(descriptor.name(format!("job {} applications", job["id"])), &auth))
        })
        .await?;

    let mut sources = vec![jobs.summary()];
    sources.extend(keyed_summaries(&applications));

    let mut report = RunReport::default();
    report.push(
        ctx.persist(
            "gupy_applications.json",
            &applications_document(&applications),
            sources,
        )
        .await?,
    );
    Ok(report)
}

/// `[{job, completed, applications}]`, one entry per job
pub fn applications_document(results: &[KeyedHarvest<Value>]) -> Value {
    Value::Array(
        results
            .iter()
            .map(|keyed| {
                json!({
                    "job": keyed.key,
                    "completed": keyed.result.completed,
                    "applications": keyed.result.records,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::test_support::{context, read_json};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::from_pairs([(API_KEY_VAR, "gupy-token")])
    }

    #[test]
    fn test_template_kind_paths() {
        assert_eq!(TemplateKind::Jobs.path(), "job-templates");
        assert_eq!(TemplateKind::Emails.file_name(), "gupy-email-templates.json");
    }

    #[tokio::test]
    async fn test_job_templates_stop_at_total_pages() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        for page in 1..=2 {
            Mock::given(method("GET"))
                .and(path("/job-templates"))
                .and(query_param("fields", "all"))
                .and(query_param("page", page.to_string()))
                .and(header("Authorization", "Bearer gupy-token"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "results": [{"id": page}],
                    "totalPages": 2
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let ctx = context(&profile(), &server.uri(), dir.path(), true);
        let report = run_templates(&ctx, &credentials(), TemplateKind::Jobs)
            .await
            .unwrap();

        assert_eq!(report.files[0].file, "gupy-job-templates.json");
        assert_eq!(
            read_json(dir.path(), "gupy-job-templates.json"),
            json!([{"id": 1}, {"id": 2}])
        );
    }

    #[tokio::test]
    async fn test_email_templates_without_fields_param() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/email-templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "welcome"}],
                "totalPages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&profile(), &server.uri(), dir.path(), false);
        run_templates(&ctx, &credentials(), TemplateKind::Emails)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_some_and(|q| !q.contains("fields")));
        assert_eq!(
            read_json(dir.path(), "gupy-email-templates.json"),
            json!([{"id": "welcome"}])
        );
    }

    #[tokio::test]
    async fn test_applications_per_job() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "name": "Dev"}, {"name": "no id"}, {"id": 2, "name": "Ops"}],
                "totalPages": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/jobs/1/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "a1"}],
                "totalPages": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/jobs/2/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "totalPages": 0
            })))
            .mount(&server)
            .await;

        let ctx = context(&profile(), &server.uri(), dir.path(), true);
        let report = run_applications(&ctx, &credentials()).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.files[0].sources.len(), 3);
        assert_eq!(
            read_json(dir.path(), "gupy_applications.json"),
            json!([
                {
                    "job": {"id": 1, "name": "Dev"},
                    "completed": true,
                    "applications": [{"id": "a1"}]
                },
                {"job": {"id": 2, "name": "Ops"}, "completed": true, "applications": []}
            ])
        );
    }
}
