//! Resource descriptors
//!
//! A [`ResourceDescriptor`] names one paginated collection: where it lives,
//! how it is authenticated, which query parameters carry the page index and
//! size, where the records sit in the body, and when the walk ends.

use super::types::{PaginationState, StopCondition};
use crate::auth::Authenticator;
use crate::error::Result;
use crate::http::RequestConfig;
use crate::template::{self, TemplateContext};
use std::sync::Arc;
use url::Url;

/// Description of one paginated collection
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Short name used in logs and errors
    pub name: String,
    /// API base URL (e.g. `https://api.gupy.io/api/v1`)
    pub base_url: String,
    /// Resource path relative to the base URL
    pub resource_path: String,
    /// Produces the auth headers attached to every request
    pub auth: Option<Arc<Authenticator>>,
    /// Query parameter carrying the page index
    pub page_param: String,
    /// Query parameter carrying the page size
    pub page_size_param: Option<String>,
    /// Page size to request
    pub page_size: Option<u32>,
    /// Dot path to the record array; `None` means the body is the array
    pub records_path: Option<String>,
    /// Dot path to a total record count, informational only
    pub total_count_path: Option<String>,
    /// Fixed query parameters sent with every page
    pub query: Vec<(String, String)>,
    /// When the walk ends
    pub stop_condition: StopCondition,
}

impl ResourceDescriptor {
    /// Create a descriptor with `page` as the page parameter and an
    /// empty-page stop condition
    pub fn new(base_url: impl Into<String>, resource_path: impl Into<String>) -> Self {
        let resource_path = resource_path.into();
        Self {
            name: resource_path.clone(),
            base_url: base_url.into(),
            resource_path,
            auth: None,
            page_param: "page".to_string(),
            page_size_param: None,
            page_size: None,
            records_path: None,
            total_count_path: None,
            query: Vec::new(),
            stop_condition: StopCondition::EmptyPage,
        }
    }

    /// Create a descriptor whose path is a `{{ var }}` template
    pub fn templated(
        base_url: impl Into<String>,
        path_template: &str,
        ctx: &TemplateContext,
    ) -> Result<Self> {
        Ok(Self::new(base_url, template::render(path_template, ctx)?))
    }

    /// Set the log name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the auth header provider
    #[must_use]
    pub fn auth(mut self, auth: Arc<Authenticator>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the page parameter name
    #[must_use]
    pub fn page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Set the page size parameter and value
    #[must_use]
    pub fn page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }

    /// Set the records path
    #[must_use]
    pub fn records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the total count path
    #[must_use]
    pub fn total_count_path(mut self, path: impl Into<String>) -> Self {
        self.total_count_path = Some(path.into());
        self
    }

    /// Add a fixed query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the stop condition
    #[must_use]
    pub fn stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }

    /// Absolute URL of the resource
    pub fn url(&self) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let path = self.resource_path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Query parameters for the page the state points at
    pub fn page_query(&self, state: &PaginationState) -> Vec<(String, String)> {
        let mut params = self.query.clone();
        params.push((self.page_param.clone(), state.page.to_string()));
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.push((param.clone(), size.to_string()));
        }
        params
    }

    /// Full request for the page the state points at, auth headers included
    pub async fn request_for(&self, state: &PaginationState) -> Result<RequestConfig> {
        let mut request = RequestConfig::new();
        request.query = self.page_query(state);
        if let Some(auth) = &self.auth {
            request = request.headers(auth.headers().await?);
        }
        Ok(request)
    }
}
