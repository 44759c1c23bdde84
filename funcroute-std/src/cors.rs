//! # CORS
//!
//! A [`CorsConfig`] is resolved once into a [`Cors`] policy. For every HTTP
//! invocation the policy either answers a preflight ([`Cors::preflight`]) or
//! decorates the handler's result ([`Cors::decorate`]).
//!
//! Decoration only adds headers. A header the handler already set, under any
//! letter case, is left untouched.

use funcroute_core::{HttpEvent, HttpResult};
use serde::Deserialize;

/// `Access-Control-Allow-Origin`.
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// `Access-Control-Allow-Methods`.
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
/// `Access-Control-Allow-Headers`.
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
/// `Access-Control-Allow-Credentials`.
pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";

const DEFAULT_ORIGINS: &[&str] = &["*"];
const DEFAULT_METHODS: &[&str] = &["GET", "HEAD", "POST"];
const SIMPLE_METHODS: &[&str] = &["GET", "HEAD", "POST"];

const SAFELISTED_HEADERS: &[&str] = &[
    // CORS-safelisted request headers
    "accept",
    "accept-language",
    "content-language",
    "content-type",
    "range",
    // set by the browser
    "accept-charset",
    "accept-encoding",
    "access-control-request-headers",
    "access-control-request-method",
    "connection",
    "content-length",
    "cookie",
    "date",
    "dnt",
    "expect",
    "host",
    "keep-alive",
    "origin",
    "referer",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "user-agent",
    "via",
    // injected by the function gateway
    "x-real-remote-address",
    "x-request-id",
    "x-trace-id",
    "uber-trace-id",
];

const SAFELISTED_HEADER_PREFIXES: &[&str] = &["proxy-", "sec-", "x-forwarded-", "x-envoy-"];

const SAFELISTED_CONTENT_TYPES: &[&str] = &[
    "application/x-www-form-urlencoded",
    "multipart/form-data",
    "text/plain",
];

/// Declared CORS configuration, deserializable from camelCase JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfig {
    /// Whether CORS handling is on at all.
    #[serde(default)]
    pub enable: bool,
    /// Accepted origins; `*` accepts any.
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
    /// Accepted methods.
    #[serde(default)]
    pub allowed_methods: Option<Vec<String>>,
    /// Accepted non-safelisted request headers.
    #[serde(default)]
    pub allowed_headers: Option<Vec<String>>,
    /// Whether credentialed requests are allowed.
    #[serde(default)]
    pub allow_credentials: Option<bool>,
}

impl CorsConfig {
    /// An enabled configuration with every field at its default.
    pub fn enabled() -> Self {
        Self {
            enable: true,
            ..Self::default()
        }
    }

    /// Sets the accepted origins.
    pub fn allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = Some(origins.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the accepted methods.
    pub fn allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the accepted request headers.
    pub fn allowed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Sets whether credentials are allowed.
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = Some(allow);
        self
    }

    /// The effective configuration, `None` when disabled.
    pub fn resolve(&self) -> Option<EffectiveCors> {
        if !self.enable {
            return None;
        }
        let or_default = |declared: &Option<Vec<String>>, default: &[&str]| {
            declared
                .clone()
                .unwrap_or_else(|| default.iter().map(|s| (*s).to_string()).collect())
        };
        Some(EffectiveCors {
            allowed_origins: or_default(&self.allowed_origins, DEFAULT_ORIGINS),
            allowed_methods: or_default(&self.allowed_methods, DEFAULT_METHODS),
            allowed_headers: self.allowed_headers.clone().unwrap_or_default(),
            allow_credentials: self.allow_credentials.unwrap_or(true),
        })
    }
}

/// A configuration with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveCors {
    /// Accepted origins.
    pub allowed_origins: Vec<String>,
    /// Accepted methods.
    pub allowed_methods: Vec<String>,
    /// Accepted request headers beyond the safelist.
    pub allowed_headers: Vec<String>,
    /// Whether credentialed requests are allowed.
    pub allow_credentials: bool,
}

/// A resolved CORS policy.
#[derive(Debug, Clone)]
pub struct Cors {
    declared: CorsConfig,
    effective: EffectiveCors,
}

impl Cors {
    /// Resolves `config`; `None` when CORS is disabled.
    pub fn new(config: CorsConfig) -> Option<Self> {
        let effective = config.resolve()?;
        Some(Self {
            declared: config,
            effective,
        })
    }

    /// The effective configuration.
    pub fn effective(&self) -> &EffectiveCors {
        &self.effective
    }

    /// Whether the request is a preflight (`OPTIONS`, any case).
    pub fn is_preflight(event: &HttpEvent) -> bool {
        event.method().eq_ignore_ascii_case("OPTIONS")
    }

    /// Whether `origin` is accepted. Comparison ignores ASCII case and one
    /// trailing slash.
    pub fn allows_origin(&self, origin: &str) -> bool {
        let origin = normalize_origin(origin);
        self.effective
            .allowed_origins
            .iter()
            .any(|allowed| allowed == "*" || normalize_origin(allowed).eq_ignore_ascii_case(origin))
    }

    /// The request's `Origin` when present and accepted.
    pub fn valid_origin<'e>(&self, event: &'e HttpEvent) -> Option<&'e str> {
        event
            .header("origin")
            .filter(|origin| self.allows_origin(origin))
    }

    /// Answers a preflight request.
    ///
    /// Always `204`. Without an accepted origin the result carries no
    /// headers at all.
    pub fn preflight(&self, event: &HttpEvent) -> HttpResult {
        let mut result = HttpResult::new(204);
        let Some(origin) = self.valid_origin(event) else {
            return result;
        };

        result = result.with_header(ALLOW_ORIGIN, origin);
        if let Some(methods) = declared_list(&self.declared.allowed_methods) {
            result = result.with_header(ALLOW_METHODS, methods);
        }
        if let Some(headers) = declared_list(&self.declared.allowed_headers) {
            result = result.with_header(ALLOW_HEADERS, headers);
        }
        if self.sends_credentials(event) {
            result = result.with_header(ALLOW_CREDENTIALS, "true");
        }
        result
    }

    /// Adds CORS headers to a handler result when the request qualifies.
    pub fn decorate(&self, event: &HttpEvent, result: HttpResult) -> HttpResult {
        let Some(origin) = self.valid_origin(event) else {
            return result;
        };
        if !is_simple_request(event) && !self.satisfies_rules(event) {
            return result;
        }

        let mut result = add_header(result, ALLOW_ORIGIN, origin);
        if self.sends_credentials(event) {
            result = add_header(result, ALLOW_CREDENTIALS, "true");
        }
        result
    }

    /// Full rule set: method allowed and every header either safelisted or
    /// declared. The origin is checked by the caller.
    fn satisfies_rules(&self, event: &HttpEvent) -> bool {
        let method = event.method();
        let method_allowed = self
            .effective
            .allowed_methods
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(method));
        method_allowed
            && event.header_names().all(|name| {
                is_safelisted_header(name)
                    || self
                        .effective
                        .allowed_headers
                        .iter()
                        .any(|allowed| allowed.trim().eq_ignore_ascii_case(name))
            })
    }

    fn sends_credentials(&self, event: &HttpEvent) -> bool {
        self.effective.allow_credentials && event.header("cookie").is_some()
    }
}

/// Simple request: safelisted method, headers and content type.
pub fn is_simple_request(event: &HttpEvent) -> bool {
    let method = event.method();
    SIMPLE_METHODS
        .iter()
        .any(|simple| simple.eq_ignore_ascii_case(method))
        && event.header_names().all(is_safelisted_header)
        && event.header("content-type").is_none_or(is_safelisted_content_type)
}

/// Whether a request header never needs to be declared.
pub fn is_safelisted_header(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    SAFELISTED_HEADERS.contains(&name.as_str())
        || SAFELISTED_HEADER_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

fn is_safelisted_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    SAFELISTED_CONTENT_TYPES
        .iter()
        .any(|safe| safe.eq_ignore_ascii_case(essence))
}

fn normalize_origin(origin: &str) -> &str {
    let origin = origin.trim();
    origin.strip_suffix('/').unwrap_or(origin)
}

fn declared_list(declared: &Option<Vec<String>>) -> Option<String> {
    declared
        .as_ref()
        .filter(|values| !values.is_empty())
        .map(|values| values.join(","))
}

fn add_header(result: HttpResult, name: &str, value: &str) -> HttpResult {
    if result.has_header(name) {
        result
    } else {
        result.with_header(name, value)
    }
}
