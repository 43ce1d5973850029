//! The ingestion pipeline service.
//!
//! [`IngestionPipeline`] is built once per process and shared by reference.
//! It owns the Overpass client (with its endpoint registry, rate limiter and
//! metrics) and the result cache, so no state lives in globals.

use std::sync::Arc;
use std::time::Duration;

use courtside_core::{BoundingBox, FacilityRecord, calculate_bounds};
use log::{debug, warn};

use crate::cache::{CacheKey, ResultCache};
use crate::config::{IngestionConfig, SportProfile};
use crate::geocode::Geocoder;
use crate::normalize::normalize;
use crate::overpass::{
    EndpointStatus, HealthCheckHandle, HttpOverpassTransport, Metrics, OverpassClient,
    OverpassTransport, QueryError, TransportBuildError, build_query, spawn_health_checks,
};

/// Searches Overpass for facilities around a point.
///
/// # Examples
///
/// ```no_run
/// use courtside_data::{IngestionConfig, IngestionPipeline};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = IngestionPipeline::from_config(IngestionConfig::default())?;
/// let records = pipeline.search_nearby(35.9523, -86.6694, 10.0).await?;
/// for record in &records {
///     println!("{} at {:?}", record.name, record.coordinates());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IngestionPipeline<T = HttpOverpassTransport> {
    client: Arc<OverpassClient<T>>,
    cache: ResultCache<Vec<FacilityRecord>>,
    sport: SportProfile,
    health_check_interval: Duration,
}

impl IngestionPipeline<HttpOverpassTransport> {
    /// Build a pipeline that talks to Overpass over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: IngestionConfig) -> Result<Self, TransportBuildError> {
        let transport = HttpOverpassTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: OverpassTransport> IngestionPipeline<T> {
    /// Build a pipeline over an explicit transport.
    pub fn with_transport(config: IngestionConfig, transport: T) -> Self {
        Self {
            client: Arc::new(OverpassClient::new(&config, transport)),
            cache: ResultCache::new(config.cache_ttl),
            sport: config.sport,
            health_check_interval: config.health_check_interval,
        }
    }

    /// Facilities within `radius_km` of (`lat`, `lng`).
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidInput`] for an invalid centre or radius,
    /// otherwise any error from [`Self::search_bounds`].
    pub async fn search_nearby(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<FacilityRecord>, QueryError> {
        let bounds = calculate_bounds(lat, lng, radius_km)?;
        self.search_bounds(&bounds).await
    }

    /// Facilities inside `bounds`, served from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns the classified Overpass failure when no cached result exists
    /// and the query fails.
    pub async fn search_bounds(
        &self,
        bounds: &BoundingBox,
    ) -> Result<Vec<FacilityRecord>, QueryError> {
        let key = CacheKey::for_bounds(bounds);
        if let Some(records) = self.cache.get(&key) {
            debug!("cache hit for {}", key.as_str());
            return Ok(records);
        }

        let query = build_query(bounds, &self.sport);
        let elements = self.client.execute_query(&query).await?;
        let records = normalize(&elements, &self.sport);
        debug!(
            "normalised {} facilities from {} elements",
            records.len(),
            elements.len()
        );
        self.cache.set(key, records.clone());
        Ok(records)
    }

    /// Like [`Self::search_nearby`], but any failure yields no facilities.
    ///
    /// Stored facilities are an independent source, so a failed external
    /// search should not abort the caller's search.
    pub async fn search_or_empty(&self, lat: f64, lng: f64, radius_km: f64) -> Vec<FacilityRecord> {
        match self.search_nearby(lat, lng, radius_km).await {
            Ok(records) => records,
            Err(err) => {
                warn!("external facility search failed, continuing without it: {err}");
                Vec::new()
            }
        }
    }

    /// Geocode `address` and search around it.
    ///
    /// An address the geocoder cannot resolve yields no facilities and no
    /// query.
    ///
    /// # Errors
    ///
    /// As for [`Self::search_nearby`].
    pub async fn search_address<G>(
        &self,
        geocoder: &G,
        address: &str,
        radius_km: f64,
    ) -> Result<Vec<FacilityRecord>, QueryError>
    where
        G: Geocoder + ?Sized,
    {
        let Some(location) = geocoder.geocode(address).await else {
            debug!("could not geocode {address:?}; skipping external search");
            return Ok(Vec::new());
        };
        self.search_nearby(location.y, location.x, radius_km).await
    }

    /// Copy of the request counters.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.client.metrics()
    }

    /// Status of every endpoint.
    #[must_use]
    pub fn endpoint_status(&self) -> Vec<EndpointStatus> {
        self.client.endpoint_status()
    }

    /// Drop expired cache entries, returning how many were removed.
    pub fn purge_expired_cache(&self) -> usize {
        self.cache.purge_expired()
    }

    /// Shared Overpass client.
    #[must_use]
    pub fn client(&self) -> &Arc<OverpassClient<T>> {
        &self.client
    }

    /// Result cache.
    #[must_use]
    pub fn cache(&self) -> &ResultCache<Vec<FacilityRecord>> {
        &self.cache
    }
}

impl<T: OverpassTransport + 'static> IngestionPipeline<T> {
    /// Start probing endpoints at the configured interval.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "dropping the handle stops the health checks"]
    pub fn spawn_health_checks(&self) -> HealthCheckHandle {
        spawn_health_checks(Arc::clone(&self.client), self.health_check_interval)
    }
}
