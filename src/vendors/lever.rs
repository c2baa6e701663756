//! Lever notes
//!
//! Notes of a list of opportunities, flattened to one row per timestamped
//! note field.

use super::{keyed_summaries, RunReport, VendorContext, VendorProfile};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::pagination::{ResourceDescriptor, StopCondition};
use crate::template::TemplateContext;
use chrono::DateTime;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "LEVER_API_KEY";

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lever defaults: retried transport and eight opportunities at a time
pub fn profile() -> VendorProfile {
    VendorProfile {
        concurrency: 8,
        max_retries: Some(3),
        ..VendorProfile::new("lever", "https://api.lever.co/v1")
    }
}

/// Harvest the notes of every opportunity listed in `opportunities_file`
pub async fn run(
    ctx: &VendorContext,
    credentials: &Credentials,
    opportunities_file: &Path,
) -> Result<RunReport> {
    let auth = Arc::new(Authenticator::new(AuthConfig::basic_api_key(
        credentials.require(API_KEY_VAR)?,
    )));

    let contents = tokio::fs::read_to_string(opportunities_file)
        .await
        .map_err(|e| {
            Error::config(format!(
                "cannot read opportunities file {}: {e}",
                opportunities_file.display()
            ))
        })?;
    let opportunities = parse_opportunity_ids(&contents);
    info!("Fetching notes for {} opportunities", opportunities.len());

    let notes = ctx
        .harvest_keyed(opportunities, |opportunity| {
            let vars = TemplateContext::new().with("opportunity_id", opportunity.as_str());
            let path = "opportunities/{{ opportunity_id }}/notes";
            Ok(ResourceDescriptor::templated(&ctx.base_url, path, &vars)?
                .name(format!("opportunity {opportunity} notes"))
                .auth(Arc::clone(&auth))
                .records_path("data")
                .stop_condition(StopCondition::single()))
        })
        .await?;

    let rows: Vec<Value> = notes
        .iter()
        .flat_map(|keyed| note_rows(&keyed.key, &keyed.result.records))
        .collect();

    let mut report = RunReport::default();
    report.push(
        ctx.persist("lever_notes.json", &Value::Array(rows), keyed_summaries(&notes))
            .await?,
    );
    Ok(report)
}

/// One id per line, surrounding whitespace trimmed, blank lines ignored
pub fn parse_opportunity_ids(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `{opportunity, createdAt, value}` for each note field with a timestamp
pub fn note_rows(opportunity: &str, notes: &[Value]) -> Vec<Value> {
    notes
        .iter()
        .filter_map(|note| note.get("fields").and_then(Value::as_array))
        .flatten()
        .filter_map(|field| {
            let created_at = field.get("createdAt")?;
            let millis = created_at.as_i64().filter(|ms| *ms != 0)?;
            let Some(timestamp) = DateTime::from_timestamp_millis(millis) else {
                warn!("Skipping note field of {opportunity} with createdAt {millis} out of range");
                return None;
            };
            Some(json!({
                "opportunity": opportunity,
                "createdAt": timestamp.format(CREATED_AT_FORMAT).to_string(),
                "value": field.get("value").cloned().unwrap_or(Value::Null),
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::test_support::{context, read_json};
    use base64::Engine;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use test_case::test_case;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_opportunity_ids() {
        assert_eq!(
            parse_opportunity_ids("abc\n\n  def  \r\n\t\nghi"),
            vec!["abc", "def", "ghi"]
        );
        assert!(parse_opportunity_ids("").is_empty());
    }

    #[test_case(json!(1_700_000_000_000_i64), Some("2023-11-14 22:13:20") ; "epoch millis")]
    #[test_case(json!(0), None ; "zero")]
    #[test_case(Value::Null, None ; "null")]
    #[test_case(json!("yesterday"), None ; "not a number")]
    fn test_note_row_created_at(created_at: Value, expected: Option<&str>) {
        let notes = vec![json!({"fields": [{"createdAt": created_at, "value": "v"}]})];
        let rows = note_rows("opp-1", &notes);

        match expected {
            Some(formatted) => assert_eq!(
                rows,
                vec![json!({"opportunity": "opp-1", "createdAt": formatted, "value": "v"})]
            ),
            None => assert!(rows.is_empty()),
        }
    }

    #[test]
    fn test_note_rows_flatten_fields() {
        let notes = vec![
            json!({"fields": [
                {"createdAt": 1_000, "value": "first"},
                {"createdAt": null, "value": "skipped"}
            ]}),
            json!({"text": "no fields"}),
            json!({"fields": [{"createdAt": 2_000, "value": 3}]}),
        ];

        assert_eq!(
            note_rows("o", &notes),
            vec![
                json!({"opportunity": "o", "createdAt": "1970-01-01 00:00:01", "value": "first"}),
                json!({"opportunity": "o", "createdAt": "1970-01-01 00:00:02", "value": 3}),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();
        let ids = dir.path().join("opportunities.txt");
        std::fs::write(&ids, "opp-1\n\nopp-2\n").unwrap();

        let basic = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("lv-key:")
        );
        Mock::given(method("GET"))
            .and(path("/opportunities/opp-1/notes"))
            .and(header("Authorization", basic.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"fields": [{"createdAt": 1_000, "value": "hello"}]}
            ]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/opportunities/opp-2/notes"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&profile(), &server.uri(), dir.path(), false);
        let creds = Credentials::from_pairs([(API_KEY_VAR, "lv-key")]);
        let report = run(&ctx, &creds, &ids).await.unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.files[0].sources.len(), 2);
        assert_eq!(
            read_json(dir.path(), "lever_notes.json"),
            json!([{"opportunity": "opp-1", "createdAt": "1970-01-01 00:00:01", "value": "hello"}])
        );
    }

    #[tokio::test]
    async fn test_run_missing_opportunities_file() {
        let dir = tempdir().unwrap();
        let ctx = context(&profile(), "http://127.0.0.1:9", dir.path(), false);
        let creds = Credentials::from_pairs([(API_KEY_VAR, "lv-key")]);

        let err = run(&ctx, &creds, &dir.path().join("missing.txt"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }
}
