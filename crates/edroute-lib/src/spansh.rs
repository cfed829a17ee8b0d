//! Client for the Spansh neutron plotter.
//!
//! Plotting is a two step exchange: a job is submitted with `POST /route`, then
//! `GET /results/{job}` is polled until the service stops answering `202`.
//! The HTTP exchange sits behind [`RouteTransport`] so the polling rules can be
//! exercised without a network.

use std::env;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::route::{Route, RouteKind, Waypoint};

pub const DEFAULT_API_BASE: &str = "https://spansh.co.uk/api";
/// Environment variable overriding [`DEFAULT_API_BASE`].
pub const API_BASE_ENV: &str = "EDROUTE_API_BASE";

pub const DEFAULT_EFFICIENCY: u8 = 60;
pub const MAX_POLLS: u32 = 20;
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const POLL_TIMEOUT: Duration = Duration::from_secs(5);
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

const STATUS_OK: u16 = 200;
const STATUS_ACCEPTED: u16 = 202;
const STATUS_BAD_REQUEST: u16 = 400;

/// Validated parameters for one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub from: String,
    pub to: String,
    pub range_ly: f64,
    pub efficiency: u8,
}

impl PlotRequest {
    /// Validate raw form input the way the plot form does.
    ///
    /// `range` is kept as text so that a typo surfaces as "Invalid range"
    /// rather than a parse error.
    pub fn new(from: &str, to: &str, range: &str, efficiency: u8) -> Result<Self> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() {
            return Err(Error::InvalidInput {
                message: "Source system is required".to_string(),
            });
        }
        if to.is_empty() {
            return Err(Error::InvalidInput {
                message: "Destination system is required".to_string(),
            });
        }

        let range_ly = validate_range(range)?;

        if !(1..=100).contains(&efficiency) {
            return Err(Error::InvalidInput {
                message: format!("Efficiency must be between 1 and 100, got {efficiency}"),
            });
        }

        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            range_ly,
            efficiency,
        })
    }
}

/// Parse a jump range in light years.
pub fn validate_range(range: &str) -> Result<f64> {
    match range.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(Error::InvalidInput {
            message: "Invalid range".to_string(),
        }),
    }
}

/// Status code and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The two requests the plotter protocol needs.
pub trait RouteTransport {
    /// Submit a plot job.
    fn submit(&self, request: &PlotRequest) -> Result<TransportResponse>;

    /// Ask for the result of a previously submitted job.
    fn poll(&self, job: &str) -> Result<TransportResponse>;
}

/// [`RouteTransport`] over HTTPS using a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Transport against `base_url`, falling back to `EDROUTE_API_BASE` and
    /// then [`DEFAULT_API_BASE`].
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        };
        Ok(Self {
            client: build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RouteTransport for HttpTransport {
    fn submit(&self, request: &PlotRequest) -> Result<TransportResponse> {
        let url = format!("{}/route", self.base_url);
        debug!(%url, from = %request.from, to = %request.to, "submitting plot job");
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("efficiency", request.efficiency.to_string()),
                ("range", request.range_ly.to_string()),
                ("from", request.from.clone()),
                ("to", request.to.clone()),
            ])
            .send()?;
        let status = response.status().as_u16();
        Ok(TransportResponse::new(status, response.text()?))
    }

    fn poll(&self, job: &str) -> Result<TransportResponse> {
        let url = format!("{}/results/{}", self.base_url, job);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(POLL_TIMEOUT)
            .send()?;
        let status = response.status().as_u16();
        Ok(TransportResponse::new(status, response.text()?))
    }
}

fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(SUBMIT_TIMEOUT)
        .user_agent(user_agent())
        .build()
        .map_err(Error::Http)
}

fn user_agent() -> String {
    format!(
        "edroute/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/edroute/edroute"
    )
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    job: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    result: RouteResult,
}

#[derive(Debug, Deserialize)]
struct RouteResult {
    system_jumps: Vec<SystemJump>,
}

#[derive(Debug, Deserialize)]
struct SystemJump {
    system: String,
    jumps: u32,
}

/// Runs the submit-and-poll protocol over a [`RouteTransport`].
#[derive(Debug, Clone)]
pub struct RouteClient<T> {
    transport: T,
    max_polls: u32,
    poll_interval: Duration,
}

impl RouteClient<HttpTransport> {
    /// Client for the live service (or the configured override).
    pub fn spansh(base_url: Option<&str>) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(base_url)?))
    }
}

impl<T: RouteTransport> RouteClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            max_polls: MAX_POLLS,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Plot a route, blocking until the service answers or the poll budget runs out.
    pub fn plot(&self, request: &PlotRequest) -> Result<Route> {
        let submitted = self.transport.submit(request)?;
        if submitted.status != STATUS_ACCEPTED {
            warn!(
                status = submitted.status,
                body = %submitted.body,
                "failed to submit plot job"
            );
            return Err(failure(&submitted));
        }

        let job: JobResponse = serde_json::from_str(&submitted.body)?;
        debug!(job = %job.job, "plot job accepted");

        let mut response = None;
        for attempt in 1..=self.max_polls {
            let polled = self.transport.poll(&job.job)?;
            if polled.status != STATUS_ACCEPTED {
                response = Some(polled);
                break;
            }
            debug!(job = %job.job, attempt, "plot job not ready");
            if attempt < self.max_polls && !self.poll_interval.is_zero() {
                thread::sleep(self.poll_interval);
            }
        }

        let Some(response) = response else {
            warn!(job = %job.job, polls = self.max_polls, "plot job timed out");
            return Err(Error::RemoteTimeout {
                attempts: self.max_polls,
            });
        };

        if response.status != STATUS_OK {
            warn!(
                status = response.status,
                body = %response.body,
                "failed to fetch plotted route"
            );
            return Err(failure(&response));
        }

        let results: ResultsResponse = serde_json::from_str(&response.body)?;
        let waypoints = results
            .result
            .system_jumps
            .into_iter()
            .map(|hop| Waypoint::plain(hop.system, Some(hop.jumps)))
            .collect::<Vec<_>>();
        let route = Route::new(RouteKind::Plain, waypoints).map_err(|err| {
            warn!(error = %err, "plotted route is unusable");
            Error::RemoteRequest {
                status: Some(response.status),
                message: err.to_string(),
            }
        })?;
        info!(
            waypoints = route.len(),
            jumps = route.total_jumps(),
            "plotted route"
        );
        Ok(route)
    }
}

/// Turn a non-success response into the matching error.
fn failure(response: &TransportResponse) -> Error {
    if response.status == STATUS_BAD_REQUEST {
        if let Ok(rejection) = serde_json::from_str::<ErrorResponse>(&response.body) {
            return Error::RouteRejected {
                source_system: rejection.error.contains("starting system"),
                destination_system: rejection.error.contains("finishing system"),
                message: rejection.error,
            };
        }
    }
    Error::RemoteRequest {
        status: Some(response.status),
        message: response.body.clone(),
    }
}
