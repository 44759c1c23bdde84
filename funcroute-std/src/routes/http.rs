use crate::predicate::{
    body_pattern_matches,
    http::{ParamPredicate, json_request_matches, method_matches, params_match},
};
use funcroute_core::{BoxHandler, Category, HttpEvent, Predicate, Route, RouterError};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Body filter of an HTTP route.
///
/// Every declared part must hold. A filter declaring neither part never
/// matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BodyFilter {
    /// Structural pattern the JSON body must contain. Requires a JSON
    /// `Content-Type`.
    #[serde(default)]
    pub json: Option<Value>,
    /// Regex the decoded raw body must match.
    #[serde(default, with = "regex_opt")]
    pub pattern: Option<Regex>,
}

impl BodyFilter {
    /// Evaluates the filter against a request.
    pub fn matches(&self, event: &HttpEvent) -> Result<bool, RouterError> {
        if self.json.is_none() && self.pattern.is_none() {
            return Ok(false);
        }
        if let Some(pattern) = &self.json {
            if !json_request_matches(event, pattern)? {
                return Ok(false);
            }
        }
        if let Some(pattern) = &self.pattern {
            return Ok(body_pattern_matches(event.body_text().as_deref(), pattern));
        }
        Ok(true)
    }
}

mod regex_opt {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, de::Error as _};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|pattern| Regex::new(&pattern).map_err(D::Error::custom))
            .transpose()
    }
}

/// Route for HTTP calls.
pub struct HttpRoute {
    methods: Option<Vec<String>>,
    params: Option<Vec<(String, ParamPredicate)>>,
    body: Option<BodyFilter>,
    handler: BoxHandler<HttpEvent>,
}

impl HttpRoute {
    /// A route matching every request.
    pub fn new(handler: BoxHandler<HttpEvent>) -> Self {
        Self {
            methods: None,
            params: None,
            body: None,
            handler,
        }
    }

    /// Restricts the route to the given methods (case-insensitive).
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a query-parameter filter. Keys compare case-insensitively;
    /// filters are evaluated in the order they were added.
    pub fn param(mut self, key: impl AsRef<str>, predicate: ParamPredicate) -> Self {
        self.params
            .get_or_insert_with(Vec::new)
            .push((key.as_ref().to_lowercase(), predicate));
        self
    }

    /// Sets the whole body filter.
    pub fn body(mut self, body: BodyFilter) -> Self {
        self.body = Some(body);
        self
    }

    /// Requires a JSON body structurally containing `pattern`.
    pub fn json(mut self, pattern: Value) -> Self {
        self.body.get_or_insert_with(BodyFilter::default).json = Some(pattern);
        self
    }

    /// Requires the decoded body to match `pattern`.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.body.get_or_insert_with(BodyFilter::default).pattern = Some(pattern);
        self
    }

    /// Whether the method filter explicitly lists `method`. A route without a
    /// method filter declares none.
    pub fn declares_method(&self, method: &str) -> bool {
        self.methods
            .as_ref()
            .is_some_and(|methods| method_matches(Some(methods.as_slice()), method))
    }

    fn matches_method(&self, event: &HttpEvent) -> Result<bool, RouterError> {
        Ok(method_matches(self.methods.as_deref(), event.method()))
    }

    fn matches_params(&self, event: &HttpEvent) -> Result<bool, RouterError> {
        match &self.params {
            Some(filter) => params_match(filter, &event.query_string_parameters),
            None => Ok(true),
        }
    }

    fn matches_body(&self, event: &HttpEvent) -> Result<bool, RouterError> {
        match &self.body {
            Some(filter) => filter.matches(event),
            None => Ok(true),
        }
    }
}

impl Route for HttpRoute {
    type Event = HttpEvent;

    const CATEGORY: Category = Category::Http;
    const PREDICATES: &'static [Predicate<Self, HttpEvent>] = &[
        Self::matches_method,
        Self::matches_params,
        Self::matches_body,
    ];

    fn handler(&self) -> &BoxHandler<HttpEvent> {
        &self.handler
    }
}
