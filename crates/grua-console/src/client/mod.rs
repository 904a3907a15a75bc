//! Typed access to the classification backend.

use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result, flatten_validation_messages};
use crate::models::{
    ConfigurationDocument, EnvironmentSummary, NodeClassification, ParameterSpec, RulesDocument,
    SearchableRecord, VariablesDocument,
};

mod request_log;
mod transport;

pub use request_log::RequestLog;
pub use transport::{ApiRequest, ApiResponse, CSRF_HEADER, HttpTransport, Method, Transport};


pub struct ConsoleClient<T = HttpTransport> {
    config: ConsoleConfig,
    transport: T,
    log: RequestLog,
}

impl<T> std::fmt::Debug for ConsoleClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl ConsoleClient<HttpTransport> {
    pub fn from_config(config: ConsoleConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout_ms)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> ConsoleClient<T> {
    pub fn new(config: ConsoleConfig, transport: T) -> Self {
        let log = RequestLog::new(config.request_log_path.clone());
        Self {
            config,
            transport,
            log,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn request_log(&self) -> &RequestLog {
        &self.log
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_classes(&self, environment: Option<&str>) -> Result<Vec<SearchableRecord>> {
        let query = optional_query("environment", environment);
        self.fetch_records("classes.list", &self.config.endpoints.classes, query, "name")
    }

    pub fn list_nodes(&self, master_zone: Option<&str>) -> Result<Vec<SearchableRecord>> {
        let query = optional_query("master_zone", master_zone);
        self.fetch_records("nodes.list", &self.config.endpoints.nodes, query, "certname")
    }

    pub fn list_facts(&self, master_zone: Option<&str>) -> Result<Vec<SearchableRecord>> {
        let query = optional_query("master_zone", master_zone);
        self.fetch_records("facts.list", &self.config.endpoints.facts, query, "name")
    }

    pub fn list_parameters(&self, class_id: &str) -> Result<Vec<ParameterSpec>> {
        self.get_json(
            "parameters.list",
            &self.config.endpoints.parameters,
            vec![("puppet_class".to_string(), class_id.to_string())],
        )
    }

    /// Environments belonging to `master_zone`.
    pub fn list_environments(&self, master_zone: &str) -> Result<Vec<EnvironmentSummary>> {
        let all: Vec<EnvironmentSummary> = self.get_json(
            "environments.list",
            &self.config.endpoints.environments,
            Vec::new(),
        )?;
        Ok(all
            .into_iter()
            .filter(|environment| environment.master_zone == master_zone)
            .collect())
    }

    pub fn get_configuration(&self, group: &str) -> Result<ConfigurationDocument> {
        let path = detail_path(&self.config.endpoints.configuration, group);
        self.get_json("configuration.get", &path, Vec::new())
    }

    pub fn put_configuration(&self, group: &str, document: &ConfigurationDocument) -> Result<()> {
        let path = detail_path(&self.config.endpoints.configuration, group);
        self.write("configuration.put", Method::Put, &path, document)
    }

    pub fn get_rules(&self, group: &str) -> Result<RulesDocument> {
        let path = detail_path(&self.config.endpoints.rules, group);
        self.get_json("rules.get", &path, Vec::new())
    }

    pub fn put_rules(&self, group: &str, document: &RulesDocument) -> Result<()> {
        let path = detail_path(&self.config.endpoints.rules, group);
        self.write("rules.put", Method::Put, &path, document)
    }

    pub fn get_variables(&self, group: &str) -> Result<VariablesDocument> {
        let path = detail_path(&self.config.endpoints.variables, group);
        self.get_json("variables.get", &path, Vec::new())
    }

    pub fn put_variables(&self, group: &str, document: &VariablesDocument) -> Result<()> {
        let path = detail_path(&self.config.endpoints.variables, group);
        self.write("variables.put", Method::Put, &path, document)
    }

    /// Asks the backend to resync environments, facts, nodes and classes of
    /// a master zone.
    pub fn refresh_master_zone(&self, master_id: &str) -> Result<()> {
        self.write(
            "master_zone.refresh",
            Method::Post,
            &self.config.endpoints.master_zone_refresh,
            &json!({ "master_id": master_id }),
        )
    }

    pub fn node_classifier(&self, certname: &str, master_id: &str) -> Result<NodeClassification> {
        let body = self.execute(
            "nodes.classifier",
            Method::Get,
            &self.config.endpoints.node_classifier,
            vec![
                ("certname".to_string(), certname.to_string()),
                ("master_id".to_string(), master_id.to_string()),
            ],
            None,
        )?;
        if body.trim().is_empty() {
            return Ok(NodeClassification::default());
        }
        Ok(serde_norway::from_str(&body)?)
    }

    fn fetch_records(
        &self,
        operation: &str,
        path: &str,
        query: Vec<(String, String)>,
        label_field: &str,
    ) -> Result<Vec<SearchableRecord>> {
        let entries: Vec<serde_json::Value> = self.get_json(operation, path, query)?;
        entries
            .iter()
            .map(|entry| SearchableRecord::from_json(entry, label_field))
            .collect()
    }

    fn get_json<R: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<R> {
        let body = self.execute(operation, Method::Get, path, query, None)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn write<B: Serialize>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.execute(operation, method, path, Vec::new(), Some(body))?;
        Ok(())
    }

    fn execute(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<String> {
        let started = Instant::now();
        let request = self.build_request(method, path, query, body);
        let outcome = self
            .transport
            .send(&request)
            .and_then(check_status);

        match outcome {
            Ok((status, body)) => {
                self.log.log_success(operation, method, path, status, started);
                Ok(body)
            }
            Err(err) => {
                self.log.log_error(operation, method, path, started, &err);
                Err(err)
            }
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> ApiRequest {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if method.is_write()
            && let Some(token) = &self.config.csrf_token
        {
            headers.push((CSRF_HEADER.to_string(), token.clone()));
        }
        ApiRequest {
            method,
            url: self.config.url(path),
            query,
            headers,
            body,
        }
    }
}

fn check_status(response: ApiResponse) -> Result<(u16, String)> {
    if response.is_success() {
        return Ok((response.status, response.body));
    }
    let message = serde_json::from_str::<serde_json::Value>(&response.body)
        .map(|body| flatten_validation_messages(&body))
        .unwrap_or_default();
    Err(ConsoleError::Rejected {
        status: response.status,
        message,
    })
}

fn detail_path(collection: &str, id: &str) -> String {
    format!("{}/{}/", collection.trim_end_matches('/'), id)
}

fn optional_query(key: &str, value: Option<&str>) -> Vec<(String, String)> {
    value
        .map(|value| vec![(key.to_string(), value.to_string())])
        .unwrap_or_default()
}
