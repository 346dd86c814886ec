//! reqwest-backed clients.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{EndpointsConfig, NetworkConfig};

use super::error::ClientError;
use super::telemetry;
use super::types::{Article, CarOffer, FlightStatus, SportEvent, WeatherReport};
use super::{FlightClient, NewsClient, RentalClient, SportsClient, WeatherClient};

/// Live implementation of every client trait over one connection pool.
pub struct HttpClients {
    client: Client,
    endpoints: EndpointsConfig,
}

impl HttpClients {
    pub fn new(network: &NetworkConfig, endpoints: &EndpointsConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(network.timeout())
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoints: endpoints.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}/{}", base.trim_end_matches('/'), path);
        let url = Url::parse_with_params(&url, params)
            .map_err(|e| ClientError::Transport(format!("Invalid URL '{}': {}", url, e)))?;

        tracing::debug!(url = %url, "Sending request");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::warn!(url = %url, status = %status, "Request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl FlightClient for HttpClients {
    async fn track(&self, code: &str) -> Result<FlightStatus, ClientError> {
        let body: Value = self
            .get_json(&self.endpoints.flights, "states/all", &[])
            .await?;
        telemetry::decode_response(&body, code)
    }
}

#[async_trait]
impl NewsClient for HttpClients {
    async fn search(&self, query: &str) -> Result<Vec<Article>, ClientError> {
        self.get_json(&self.endpoints.news, "search", &[("q", query)])
            .await
    }
}

#[async_trait]
impl WeatherClient for HttpClients {
    async fn current(&self, city: &str) -> Result<WeatherReport, ClientError> {
        self.get_json(&self.endpoints.weather, "current", &[("city", city)])
            .await
    }
}

#[async_trait]
impl SportsClient for HttpClients {
    async fn events(&self) -> Result<Vec<SportEvent>, ClientError> {
        self.get_json(&self.endpoints.sports, "events", &[]).await
    }
}

#[async_trait]
impl RentalClient for HttpClients {
    async fn offers(&self, location: &str) -> Result<Vec<CarOffer>, ClientError> {
        self.get_json(&self.endpoints.rentals, "offers", &[("location", location)])
            .await
    }
}
