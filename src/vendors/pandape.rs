//! PandaPe API
//!
//! Vacancies and their matches, authenticated with an OAuth2 client
//! credentials token that is fetched once and reused.

use super::{keyed_summaries, RunReport, VendorContext, VendorProfile};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::Credentials;
use crate::error::Result;
use crate::harvest::KeyedHarvest;
use crate::join::key_of;
use crate::pagination::{ResourceDescriptor, StopCondition};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

/// Environment variable holding the OAuth2 client id
pub const CLIENT_ID_VAR: &str = "PANDAPE_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret
pub const CLIENT_SECRET_VAR: &str = "PANDAPE_CLIENT_SECRET";

/// Production token endpoint
pub const TOKEN_URL: &str = "https://login.pandape.com.br/connect/token";

const VACANCY_PAGE_SIZE: u32 = 1000;
const MATCH_PAGE_SIZE: u32 = 10;

/// What to produce from the matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Vacancies and all matches → `pandape-jobs.json`, `pandape-applications.json`
    Data,
    /// Matches with social networks → `pandape-linkedins.json`
    Linkedin,
}

/// PandaPe defaults
pub fn profile() -> VendorProfile {
    VendorProfile::new("pandape", "https://api.pandape.com.br/v2")
}

/// PandaPe list: `Page`/`PageSize` parameters, records under `items`
fn paged(
    ctx: &VendorContext,
    path: &str,
    auth: &Arc<Authenticator>,
    page_size: u32,
) -> ResourceDescriptor {
    ctx.descriptor(path)
        .auth(Arc::clone(auth))
        .page_param("Page")
        .page_size("PageSize", page_size)
        .records_path("items")
}

/// Harvest vacancies and matches
pub async fn run(ctx: &VendorContext, credentials: &Credentials, mode: Mode) -> Result<RunReport> {
    let token_url = ctx
        .settings
        .token_url
        .clone()
        .unwrap_or_else(|| TOKEN_URL.to_string());
    let auth = Arc::new(Authenticator::new(AuthConfig::client_credentials(
        token_url,
        credentials.require(CLIENT_ID_VAR)?,
        credentials.require(CLIENT_SECRET_VAR)?,
    )));
    let mut report = RunReport::default();

    let vacancy_stop = ctx
        .settings
        .max_pages
        .map_or(StopCondition::EmptyPage, StopCondition::fixed);
    let vacancies = ctx
        .harvest(
            &paged(ctx, "vacancies", &auth, ctx.page_size(VACANCY_PAGE_SIZE))
                .stop_condition(vacancy_stop),
        )
        .await?;

    if mode == Mode::Data {
        report.push(
            ctx.persist(
                "pandape-jobs.json",
                &Value::Array(vacancies.records.clone()),
                vec![vacancies.summary()],
            )
            .await?,
        );
    }

    let vacancy_ids = vacancy_ids(&vacancies.records);
    let matches = ctx
        .harvest_keyed(vacancy_ids, |id| {
            let id = key_of(id).unwrap_or_default();
            Ok(paged(ctx, "matches", &auth, MATCH_PAGE_SIZE)
                .name(format!("vacancy {id} matches"))
                .query("IdVacancy", id))
        })
        .await?;

    let mut sources = vec![vacancies.summary()];
    sources.extend(keyed_summaries(&matches));

    match mode {
        Mode::Data => {
            report.push(
                ctx.persist(
                    "pandape-applications.json",
                    &Value::Array(applications(&matches)),
                    sources,
                )
                .await?,
            );
        }
        Mode::Linkedin => {
            report.push(
                ctx.persist(
                    "pandape-linkedins.json",
                    &Value::Array(linkedin_matches(&matches)),
                    sources,
                )
                .await?,
            );
        }
    }

    Ok(report)
}

/// Vacancy ids from `idVacancy`
pub fn vacancy_ids(vacancies: &[Value]) -> Vec<Value> {
    vacancies
        .iter()
        .filter_map(|vacancy| match vacancy.get("idVacancy") {
            Some(id) if key_of(id).is_some() => Some(id.clone()),
            _ => {
                warn!("Skipping vacancy without an idVacancy");
                None
            }
        })
        .collect()
}

fn all_matches<K>(results: &[KeyedHarvest<K>]) -> impl Iterator<Item = &Value> {
    results.iter().flat_map(|keyed| keyed.result.records.iter())
}

fn has_match_id(record: &Value) -> bool {
    record.get("idMatch").is_some_and(|id| !id.is_null())
}

/// Every match that carries an `idMatch`, vacancy by vacancy
pub fn applications<K>(results: &[KeyedHarvest<K>]) -> Vec<Value> {
    all_matches(results)
        .filter(|record| {
            let keep = has_match_id(record);
            if !keep {
                warn!("Skipping match without idMatch");
            }
            keep
        })
        .cloned()
        .collect()
}

/// Matches with a non-empty `socialNetworks`, projected to their ids
pub fn linkedin_matches<K>(results: &[KeyedHarvest<K>]) -> Vec<Value> {
    all_matches(results)
        .filter(|record| has_match_id(record))
        .filter(|record| {
            record
                .get("socialNetworks")
                .and_then(Value::as_array)
                .is_some_and(|networks| !networks.is_empty())
        })
        .map(|record| {
            json!({
                "socialNetworks": record["socialNetworks"],
                "idMatch": record["idMatch"],
                "idCandidate": record["idCandidate"],
                "idVacancy": record["idVacancy"],
            })
        })
        .collect()
}
