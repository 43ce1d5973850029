//! Runtime configuration for the ingestion pipeline.
//!
//! [`IngestionConfig`] gathers every tunable the pipeline reads: the endpoint
//! list, HTTP identity, timeouts, the retry budget, rate-limit window, cache
//! lifetime and health-check cadence. Defaults match the public Overpass
//! deployment this crate was written against.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Public Overpass interpreters used when no endpoints are configured.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];

/// Default user agent sent with Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "courtside-ingest/0.1";

/// Hard deadline for a single Overpass request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for a liveness probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Retries attempted after the first failed request.
pub const DEFAULT_RETRIES: u32 = 3;

/// Requests permitted per endpoint within one rate-limit window.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 5;

/// Length of a rate-limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Lifetime of a cached search result.
pub const CACHE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Interval between background endpoint probes.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Backoff unit; attempt `n` waits `n` units before retrying.
pub const BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// Sport searched for when none is configured.
pub const DEFAULT_SPORT: &str = "pickleball";

/// Errors raised while validating configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An endpoint URL failed to parse or used an unsupported scheme.
    #[error("invalid endpoint URL {url:?}: {message}")]
    InvalidEndpoint { url: String, message: String },
    /// The endpoint list was empty.
    #[error("at least one Overpass endpoint must be configured")]
    NoEndpoints,
    /// The sport keyword contained characters outside `[a-z0-9_]`.
    #[error("invalid sport keyword {keyword:?}: use lowercase letters, digits or '_'")]
    InvalidSport { keyword: String },
}

/// Validated HTTP(S) URL of an Overpass interpreter.
///
/// The string form is used as the endpoint identity in the health registry
/// and as the rate-limiter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointUrl(String);

impl EndpointUrl {
    /// Parse and validate an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the value does not parse
    /// or its scheme is not `http` or `https`.
    ///
    /// # Examples
    ///
    /// ```
    /// use courtside_data::EndpointUrl;
    ///
    /// let url = EndpointUrl::parse("https://overpass-api.de/api/interpreter")?;
    /// assert_eq!(url.as_str(), "https://overpass-api.de/api/interpreter");
    /// assert!(EndpointUrl::parse("ftp://example.com").is_err());
    /// # Ok::<(), courtside_data::ConfigError>(())
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidEndpoint {
            url: raw.to_owned(),
            message: err.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self(parsed.into())),
            other => Err(ConfigError::InvalidEndpoint {
                url: raw.to_owned(),
                message: format!("unsupported scheme {other:?}"),
            }),
        }
    }

    /// Borrow the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The sport whose facilities are searched for.
///
/// The keyword appears verbatim inside Overpass regular expressions, so it is
/// restricted to lowercase ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportProfile {
    keyword: String,
}

impl SportProfile {
    /// Build a profile for `keyword`, normalised to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSport`] for empty keywords or keywords
    /// containing anything other than `[a-z0-9_]`.
    pub fn new(keyword: &str) -> Result<Self, ConfigError> {
        let keyword = keyword.trim().to_ascii_lowercase();
        let valid = !keyword.is_empty()
            && keyword
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
        if valid {
            Ok(Self { keyword })
        } else {
            Err(ConfigError::InvalidSport { keyword })
        }
    }

    /// The lowercase sport keyword, as used in the OSM `sport` tag.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Default for SportProfile {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_SPORT.to_owned(),
        }
    }
}

/// Configuration for [`crate::IngestionPipeline`].
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Interchangeable Overpass interpreters, in preference order.
    pub endpoints: Vec<EndpointUrl>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Hard deadline for one request attempt.
    pub request_timeout: Duration,
    /// Deadline for a liveness probe.
    pub probe_timeout: Duration,
    /// Retries after the first failed attempt.
    pub retries: u32,
    /// Requests permitted per endpoint within [`Self::rate_limit_window`].
    pub rate_limit_max_requests: u32,
    /// Length of a rate-limit window.
    pub rate_limit_window: Duration,
    /// Lifetime of cached search results.
    pub cache_ttl: Duration,
    /// Interval between background endpoint probes.
    pub health_check_interval: Duration,
    /// Linear backoff unit between retries.
    pub backoff_step: Duration,
    /// Sport searched for.
    pub sport: SportProfile,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS
                .iter()
                .map(|url| EndpointUrl((*url).to_owned()))
                .collect(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            request_timeout: REQUEST_TIMEOUT,
            probe_timeout: PROBE_TIMEOUT,
            retries: DEFAULT_RETRIES,
            rate_limit_max_requests: RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window: RATE_LIMIT_WINDOW,
            cache_ttl: CACHE_DURATION,
            health_check_interval: HEALTH_CHECK_INTERVAL,
            backoff_step: BACKOFF_STEP,
            sport: SportProfile::default(),
        }
    }
}

impl IngestionConfig {
    /// Replace the endpoint list with parsed `urls`.
    ///
    /// # Errors
    ///
    /// Fails when any URL is invalid or when `urls` is empty.
    pub fn with_endpoints<I, S>(mut self, urls: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = urls
            .into_iter()
            .map(|url| EndpointUrl::parse(url.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        self.endpoints = endpoints;
        Ok(self)
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the probe deadline.
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the retry budget.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the rate-limit cap and window.
    #[must_use]
    pub fn with_rate_limit(mut self, max_requests: u32, window: Duration) -> Self {
        self.rate_limit_max_requests = max_requests;
        self.rate_limit_window = window;
        self
    }

    /// Set how long search results stay cached.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the interval between background probes.
    ///
    /// The health checker clamps it to
    /// [`MIN_HEALTH_CHECK_INTERVAL`](crate::overpass::MIN_HEALTH_CHECK_INTERVAL)
    /// and [`MAX_HEALTH_CHECK_INTERVAL`](crate::overpass::MAX_HEALTH_CHECK_INTERVAL).
    #[must_use]
    pub fn with_health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    /// Set the linear backoff unit.
    #[must_use]
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// Set the sport searched for.
    #[must_use]
    pub fn with_sport(mut self, sport: SportProfile) -> Self {
        self.sport = sport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_use_public_endpoints() {
        let config = IngestionConfig::default();
        let urls: Vec<&str> = config.endpoints.iter().map(EndpointUrl::as_str).collect();
        assert_eq!(urls, DEFAULT_ENDPOINTS);
        assert_eq!(config.retries, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert_eq!(config.sport.keyword(), "pickleball");
    }

    #[rstest]
    fn default_endpoints_are_valid_urls() {
        for raw in DEFAULT_ENDPOINTS {
            let parsed = EndpointUrl::parse(raw).expect("default endpoint parses");
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://overpass.example.com/api")]
    fn rejects_bad_endpoints(#[case] raw: &str) {
        let err = EndpointUrl::parse(raw).expect_err("endpoint should be rejected");
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }), "{err:?}");
    }

    #[rstest]
    fn with_endpoints_rejects_empty_list() {
        let err = IngestionConfig::default()
            .with_endpoints(Vec::<String>::new())
            .expect_err("empty list rejected");
        assert_eq!(err, ConfigError::NoEndpoints);
    }

    #[rstest]
    fn with_endpoints_keeps_order() {
        let config = IngestionConfig::default()
            .with_endpoints(["http://b.example/api", "http://a.example/api"])
            .expect("endpoints parse");
        assert_eq!(config.endpoints[0].as_str(), "http://b.example/api");
        assert_eq!(config.endpoints[1].as_str(), "http://a.example/api");
    }

    #[rstest]
    #[case("Tennis", Some("tennis"))]
    #[case(" padel ", Some("padel"))]
    #[case("table_tennis", Some("table_tennis"))]
    #[case("", None)]
    #[case("ball|court", None)]
    #[case("pickle ball", None)]
    fn sport_keywords_are_restricted(#[case] raw: &str, #[case] expected: Option<&str>) {
        let outcome = SportProfile::new(raw).ok();
        assert_eq!(outcome.as_ref().map(SportProfile::keyword), expected);
    }
}
