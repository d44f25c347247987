//! HTTP implementation of [`DataSource`].
//!
//! Paths, relative to [`EndpointConfig::base_url`]:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | annotations | `GET resources/{id}/annotations` |
//! | create annotation | `POST resources/{id}/annotations` |
//! | update annotation | `PUT annotations/{id}` |
//! | delete annotation | `DELETE annotations/{id}` |
//! | chunks | `GET resources/{id}/chunks` |
//! | quality | `GET resources/{id}/quality` |
//! | references | `GET resources/{id}/references` |
//! | symbol summary | `GET resources/{id}/symbols/{name}/summary` |
//!
//! Failures are returned as-is: retry policy belongs to the caller.

use async_trait::async_trait;
use marginalia_model::{Annotation, AnnotationPatch, NewAnnotation, QualityDetails, Reference, SemanticChunk, SymbolSummary};
use marginalia_primitives::{AnnotationId, ResourceId};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{DataSource, EndpointConfig, Result, SourceError};

/// Data source backed by the resource services' HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSource {
	client: Client,
	base: Url,
}

impl HttpSource {
	/// Builds a source from endpoint configuration.
	pub fn new(config: &EndpointConfig) -> Result<Self> {
		let base = Url::parse(&config.base_url).map_err(|e| SourceError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
		if base.cannot_be_a_base() {
			return Err(SourceError::InvalidBaseUrl(config.base_url.clone()));
		}
		let client = Client::builder().timeout(config.timeout()).build()?;
		Ok(Self { client, base })
	}

	/// Appends percent-encoded path segments to the base URL.
	fn url(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|()| SourceError::InvalidBaseUrl(self.base.to_string()))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response> {
		let response = request.send().await?;
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		let body = response.text().await.unwrap_or_default();
		if status.as_u16() == 404 {
			return Err(SourceError::NotFound(body));
		}
		Err(SourceError::Status {
			status: status.as_u16(),
			body,
		})
	}

	async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
		let url = self.url(segments)?;
		debug!(url = %url, "GET");
		let response = self.send(self.client.get(url)).await?;
		Ok(response.json().await?)
	}
}

#[async_trait]
impl DataSource for HttpSource {
	async fn annotations(&self, resource: &ResourceId) -> Result<Vec<Annotation>> {
		self.get_json(&["resources", resource.as_str(), "annotations"]).await
	}

	async fn create_annotation(&self, annotation: &NewAnnotation) -> Result<Annotation> {
		let url = self.url(&["resources", annotation.resource_id.as_str(), "annotations"])?;
		debug!(url = %url, "POST");
		let response = self.send(self.client.post(url).json(annotation)).await?;
		Ok(response.json().await?)
	}

	async fn update_annotation(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<Annotation> {
		let url = self.url(&["annotations", id.as_str()])?;
		debug!(url = %url, "PUT");
		let response = self.send(self.client.put(url).json(patch)).await?;
		Ok(response.json().await?)
	}

	async fn delete_annotation(&self, id: &AnnotationId) -> Result<()> {
		let url = self.url(&["annotations", id.as_str()])?;
		debug!(url = %url, "DELETE");
		self.send(self.client.delete(url)).await?;
		Ok(())
	}

	async fn chunks(&self, resource: &ResourceId) -> Result<Vec<SemanticChunk>> {
		self.get_json(&["resources", resource.as_str(), "chunks"]).await
	}

	async fn quality(&self, resource: &ResourceId) -> Result<QualityDetails> {
		self.get_json(&["resources", resource.as_str(), "quality"]).await
	}

	async fn references(&self, resource: &ResourceId) -> Result<Vec<Reference>> {
		self.get_json(&["resources", resource.as_str(), "references"]).await
	}

	async fn symbol_summary(&self, resource: &ResourceId, symbol: &str) -> Result<SymbolSummary> {
		self.get_json(&["resources", resource.as_str(), "symbols", symbol, "summary"]).await
	}
}
