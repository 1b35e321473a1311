//! HTTP connector for the classifier and linker services
//!
//! Both take a form-encoded `input_text` POST and answer JSON. With an
//! ablation flag on, `ablation=true` asks the service for its gold output.

use std::time::Duration;

use async_trait::async_trait;
use geoqa_types::{LinkingResponse, LinkingResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::error;
use url::Url;

use super::{Classification, EntityLinker, GeoClassifier};
use crate::config::Settings;
use crate::error::{GeoQaError, ServiceError};

const SERVICE_TIMEOUT_SECS: u64 = 60;

pub struct ServiceConnector {
    client: Client,
    classifier_url: Url,
    linker_url: Url,
    ablation_classification: bool,
    ablation_linking: bool,
}

impl ServiceConnector {
    pub fn new(client: Client, classifier_url: Url, linker_url: Url) -> Self {
        Self {
            client,
            classifier_url,
            linker_url,
            ablation_classification: false,
            ablation_linking: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, GeoQaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SERVICE_TIMEOUT_SECS))
            .build()
            .map_err(|source| ServiceError::Transport {
                url: "client".to_string(),
                source,
            })?;

        Ok(Self::new(client, settings.classifier_url()?, settings.linker_url()?)
            .with_ablation(
                settings.evaluation.ablation_classification,
                settings.evaluation.ablation_linking,
            ))
    }

    pub fn with_ablation(mut self, classification: bool, linking: bool) -> Self {
        self.ablation_classification = classification;
        self.ablation_linking = linking;
        self
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: &Url,
        question: &str,
        ablation: bool,
    ) -> Result<T, ServiceError> {
        let mut params = vec![("input_text", question)];
        if ablation {
            params.push(("ablation", "true"));
        }

        let response = self
            .client
            .post(url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|source| {
                error!("Failed to connect to {}: {}", url, source);
                ServiceError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Problem in connecting to {}: status {}", url, status);
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ServiceError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ServiceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl GeoClassifier for ServiceConnector {
    async fn classify(&self, question: &str) -> Result<Classification, ServiceError> {
        self.post(&self.classifier_url, question, self.ablation_classification)
            .await
    }
}

#[async_trait]
impl EntityLinker for ServiceConnector {
    async fn link(&self, question: &str) -> Result<LinkingResult, ServiceError> {
        let response: LinkingResponse = self
            .post(&self.linker_url, question, self.ablation_linking)
            .await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.evaluation.ablation_linking = true;
        let connector = ServiceConnector::from_settings(&settings).unwrap();
        assert_eq!(connector.classifier_url.as_str(), "http://localhost:9091/classify");
        assert_eq!(connector.linker_url.as_str(), "http://localhost:9092/link");
        assert!(!connector.ablation_classification);
        assert!(connector.ablation_linking);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut settings = Settings::default();
        settings.linker.url = Some("::nope".to_string());
        assert!(matches!(
            ServiceConnector::from_settings(&settings),
            Err(GeoQaError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        let connector = ServiceConnector::new(
            client,
            Url::parse("http://127.0.0.1:1/classify").unwrap(),
            Url::parse("http://127.0.0.1:1/link").unwrap(),
        );
        let err = connector.classify("Which parks are in Walle?").await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport { .. }));
    }
}
