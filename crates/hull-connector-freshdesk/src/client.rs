//! Freshdesk REST API client.
//!
//! Every call is normalized into an [`ApiResultObject`]; transport and
//! HTTP-status failures are captured in the result rather than raised, so
//! the orchestration layer can log and continue per the fetch contract.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use hull_connector::api_result::ApiResultObject;
use hull_connector::error::{ConnectorError, ConnectorResult};
use hull_connector::types::ApiMethod;

use crate::objects::{
    FreshdeskAgent, FreshdeskCompany, FreshdeskCompanyField, FreshdeskCompanyPayload,
    FreshdeskContact, FreshdeskContactField, FreshdeskContactPayload, FreshdeskFilterResult,
    FreshdeskPagedResult, FreshdeskTicket,
};

/// Page size used for all list endpoints.
pub const PER_PAGE: u32 = 100;

/// Sub-resources expanded on every ticket list call.
const TICKET_INCLUDES: &str = "description,requester,stats";

/// Client for the Freshdesk v2 REST API.
#[derive(Debug, Clone)]
pub struct FreshdeskClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FreshdeskClient {
    /// Create a client for `https://<domain>.freshdesk.com/api/v2`.
    pub fn new(domain: &str, api_key: &str) -> ConnectorResult<Self> {
        Self::with_base_url(&format!("https://{domain}.freshdesk.com/api/v2"), api_key)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: &str, api_key: &str) -> ConnectorResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ConnectorError::network_with_source("failed to build client", err))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// List contacts, optionally restricted to those updated since a
    /// given ISO-8601 timestamp.
    pub async fn list_contacts(
        &self,
        page: u32,
        updated_since: Option<&str>,
    ) -> ApiResultObject<(), FreshdeskPagedResult<FreshdeskContact>> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", PER_PAGE.to_string()),
        ];
        if let Some(since) = updated_since {
            query.push(("_updated_since", since.to_string()));
        }
        let builder = self.http.get(self.url("/contacts")).query(&query);
        self.run_paged(builder, self.url("/contacts"), page).await
    }

    /// List companies. The API offers no update-time filter here; the
    /// caller narrows results client-side for incremental jobs.
    pub async fn list_companies(
        &self,
        page: u32,
    ) -> ApiResultObject<(), FreshdeskPagedResult<FreshdeskCompany>> {
        let query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", PER_PAGE.to_string()),
        ];
        let builder = self.http.get(self.url("/companies")).query(&query);
        self.run_paged(builder, self.url("/companies"), page).await
    }

    /// List tickets updated since a given timestamp, newest first, with
    /// description, requester and stats expanded.
    pub async fn list_tickets(
        &self,
        page: u32,
        updated_since: Option<&str>,
    ) -> ApiResultObject<(), FreshdeskPagedResult<FreshdeskTicket>> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("order_by", "updated_at".to_string()),
            ("order_type", "desc".to_string()),
            ("include", TICKET_INCLUDES.to_string()),
        ];
        if let Some(since) = updated_since {
            query.push(("updated_since", since.to_string()));
        }
        let builder = self.http.get(self.url("/tickets")).query(&query);
        self.run_paged(builder, self.url("/tickets"), page).await
    }

    /// Search contacts with a filter query, e.g. `email:'jane@hull.io'`.
    ///
    /// The API requires the query wrapped in double quotes inside the
    /// parameter value.
    pub async fn search_contacts(
        &self,
        query: &str,
    ) -> ApiResultObject<String, FreshdeskFilterResult<FreshdeskContact>> {
        let builder = self
            .http
            .get(self.url("/search/contacts"))
            .query(&[("query", format!("\"{query}\""))]);
        self.run(ApiMethod::Query, builder, self.url("/search/contacts"), Some(query.to_string()))
            .await
    }

    /// Search companies with a filter query, e.g. `domain:'hull.io'`.
    pub async fn search_companies(
        &self,
        query: &str,
    ) -> ApiResultObject<String, FreshdeskFilterResult<FreshdeskCompany>> {
        let builder = self
            .http
            .get(self.url("/search/companies"))
            .query(&[("query", format!("\"{query}\""))]);
        self.run(
            ApiMethod::Query,
            builder,
            self.url("/search/companies"),
            Some(query.to_string()),
        )
        .await
    }

    /// Create a contact.
    pub async fn create_contact(
        &self,
        payload: FreshdeskContactPayload,
    ) -> ApiResultObject<FreshdeskContactPayload, FreshdeskContact> {
        let builder = self.http.post(self.url("/contacts")).json(&payload);
        self.run(ApiMethod::Insert, builder, self.url("/contacts"), Some(payload))
            .await
    }

    /// Update an existing contact.
    pub async fn update_contact(
        &self,
        id: i64,
        payload: FreshdeskContactPayload,
    ) -> ApiResultObject<FreshdeskContactPayload, FreshdeskContact> {
        let endpoint = self.url(&format!("/contacts/{id}"));
        let builder = self.http.put(&endpoint).json(&payload);
        self.run(ApiMethod::Update, builder, endpoint, Some(payload))
            .await
    }

    /// Create a company.
    pub async fn create_company(
        &self,
        payload: FreshdeskCompanyPayload,
    ) -> ApiResultObject<FreshdeskCompanyPayload, FreshdeskCompany> {
        let builder = self.http.post(self.url("/companies")).json(&payload);
        self.run(ApiMethod::Insert, builder, self.url("/companies"), Some(payload))
            .await
    }

    /// Update an existing company.
    pub async fn update_company(
        &self,
        id: i64,
        payload: FreshdeskCompanyPayload,
    ) -> ApiResultObject<FreshdeskCompanyPayload, FreshdeskCompany> {
        let endpoint = self.url(&format!("/companies/{id}"));
        let builder = self.http.put(&endpoint).json(&payload);
        self.run(ApiMethod::Update, builder, endpoint, Some(payload))
            .await
    }

    /// Fetch the live contact field catalogue.
    pub async fn get_contact_fields(&self) -> ApiResultObject<(), Vec<FreshdeskContactField>> {
        let builder = self.http.get(self.url("/contact_fields"));
        self.run(ApiMethod::Query, builder, self.url("/contact_fields"), None)
            .await
    }

    /// Fetch the live company field catalogue.
    pub async fn get_company_fields(&self) -> ApiResultObject<(), Vec<FreshdeskCompanyField>> {
        let builder = self.http.get(self.url("/company_fields"));
        self.run(ApiMethod::Query, builder, self.url("/company_fields"), None)
            .await
    }

    /// Fetch the currently authenticated agent. Used as the credential
    /// probe for status determination.
    pub async fn get_current_agent(&self) -> ApiResultObject<(), FreshdeskAgent> {
        let builder = self.http.get(self.url("/agents/me"));
        self.run(ApiMethod::Query, builder, self.url("/agents/me"), None)
            .await
    }

    /// Execute a request and normalize the outcome.
    async fn run<R, D>(
        &self,
        method: ApiMethod,
        builder: RequestBuilder,
        fallback_endpoint: String,
        record: Option<R>,
    ) -> ApiResultObject<R, D>
    where
        D: DeserializeOwned,
    {
        let (endpoint, outcome) = self.dispatch(builder, &fallback_endpoint).await;
        match outcome {
            Ok((status, _has_link, body)) => {
                if !status.is_success() {
                    return ApiResultObject::failure(
                        endpoint,
                        method,
                        record,
                        vec![format!("Request failed with status code {}", status.as_u16())],
                        parse_error_body(&body),
                    );
                }
                match serde_json::from_str::<D>(&body) {
                    Ok(data) => ApiResultObject::success(endpoint, method, record, data),
                    Err(err) => ApiResultObject::failure(
                        endpoint,
                        method,
                        record,
                        vec![err.to_string()],
                        None,
                    ),
                }
            }
            Err(message) => ApiResultObject::failure(endpoint, method, record, vec![message], None),
        }
    }

    /// Execute a list request and wrap the rows into a page.
    async fn run_paged<T>(
        &self,
        builder: RequestBuilder,
        fallback_endpoint: String,
        page: u32,
    ) -> ApiResultObject<(), FreshdeskPagedResult<T>>
    where
        T: DeserializeOwned,
    {
        let (endpoint, outcome) = self.dispatch(builder, &fallback_endpoint).await;
        match outcome {
            Ok((status, has_link, body)) => {
                if !status.is_success() {
                    return ApiResultObject::failure(
                        endpoint,
                        ApiMethod::Query,
                        None,
                        vec![format!("Request failed with status code {}", status.as_u16())],
                        parse_error_body(&body),
                    );
                }
                match serde_json::from_str::<Vec<T>>(&body) {
                    Ok(results) => ApiResultObject::success(
                        endpoint,
                        ApiMethod::Query,
                        None,
                        FreshdeskPagedResult {
                            results,
                            page,
                            per_page: PER_PAGE,
                            has_more: has_link,
                        },
                    ),
                    Err(err) => ApiResultObject::failure(
                        endpoint,
                        ApiMethod::Query,
                        None,
                        vec![err.to_string()],
                        None,
                    ),
                }
            }
            Err(message) => {
                ApiResultObject::failure(endpoint, ApiMethod::Query, None, vec![message], None)
            }
        }
    }

    /// Send the request. Returns the resolved endpoint plus either
    /// `(status, link-header-present, body)` or a transport error message.
    async fn dispatch(
        &self,
        builder: RequestBuilder,
        fallback_endpoint: &str,
    ) -> (String, Result<(StatusCode, bool, String), String>) {
        let request = match builder.basic_auth(&self.api_key, Some("X")).build() {
            Ok(request) => request,
            Err(err) => return (fallback_endpoint.to_string(), Err(err.to_string())),
        };
        let endpoint = request.url().to_string();
        debug!(endpoint = %endpoint, "dispatching freshdesk request");

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(err) => return (endpoint, Err(err.to_string())),
        };
        let status = response.status();
        let has_link = response.headers().contains_key(reqwest::header::LINK);
        match response.text().await {
            Ok(body) => (endpoint, Ok((status, has_link, body))),
            Err(err) => (endpoint, Err(err.to_string())),
        }
    }
}

/// Parse a response body as a structured error payload when possible.
fn parse_error_body(body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}
