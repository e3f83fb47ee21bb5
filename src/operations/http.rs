// HTTP Appliance Client
// reqwest-backed implementation of the appliance API

use reqwest::{Client, Method, RequestBuilder, Url};

use super::api::ApplianceApi;
use super::error::{SyncError, SyncResult};
use crate::core::{Collection, CollectionKind};

/// Client for the appliance webservice
#[derive(Debug, Clone)]
pub struct HttpApplianceApi {
    client: Client,
    base_url: Url,
}

impl HttpApplianceApi {
    /// Create a client rooted at `base_url` (e.g. `http://filter.lan:8080/`)
    pub fn new(base_url: &str) -> SyncResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| SyncError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL for a resource path; each segment is escaped
    pub fn endpoint(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and fail on transport errors or non-success status
    async fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> SyncResult<reqwest::Response> {
        let method_name = method_name(&method);
        let url_text = url.to_string();
        tracing::debug!(method = method_name, url = %url_text, "Appliance request");

        let response = build(self.client.request(method, url))
            .send()
            .await
            .map_err(|source| SyncError::Transport {
                method: method_name,
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                method: method_name,
                url: url_text,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn post_value(&self, device: &str, attribute: &str, value: &str) -> SyncResult<()> {
        let url = self.endpoint(&[CollectionKind::Devices.resource(), device, attribute])?;
        self.send(Method::POST, url, |req| req.form(&[("value", value)]))
            .await?;
        Ok(())
    }
}

fn method_name(method: &Method) -> &'static str {
    if *method == Method::GET {
        "GET"
    } else if *method == Method::POST {
        "POST"
    } else if *method == Method::DELETE {
        "DELETE"
    } else {
        "HTTP"
    }
}

/// Wire form of a device flag (`True` / `False`)
pub fn flag_wire_value(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

impl ApplianceApi for HttpApplianceApi {
    async fn fetch(&self, kind: CollectionKind) -> SyncResult<Collection> {
        let url = self.endpoint(&[kind.resource()])?;
        let url_text = url.to_string();
        let response = self.send(Method::GET, url, |req| req).await?;
        let body = response.text().await.map_err(|source| SyncError::Transport {
            method: "GET",
            url: url_text,
            source,
        })?;

        Collection::decode(kind, &body).map_err(|e| SyncError::Decode {
            kind,
            reason: e.to_string(),
        })
    }

    async fn add(&self, kind: CollectionKind, name: &str) -> SyncResult<()> {
        let field = kind.form_field().unwrap_or("name");
        let url = self.endpoint(&[kind.resource()])?;
        self.send(Method::POST, url, |req| req.form(&[(field, name)]))
            .await?;
        Ok(())
    }

    async fn remove(&self, kind: CollectionKind, name: &str) -> SyncResult<()> {
        let url = self.endpoint(&[kind.resource(), name])?;
        self.send(Method::DELETE, url, |req| req).await?;
        Ok(())
    }

    async fn set_filtered(&self, device: &str, value: bool) -> SyncResult<()> {
        self.post_value(device, "is_filtered", flag_wire_value(value))
            .await
    }

    async fn rename_device(&self, device: &str, display_name: &str) -> SyncResult<()> {
        self.post_value(device, "display_name", display_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_and_escapes_segments() {
        let api = HttpApplianceApi::new("http://filter.lan:8080").unwrap();
        assert_eq!(
            api.endpoint(&["domains"]).unwrap().as_str(),
            "http://filter.lan:8080/domains"
        );
        assert_eq!(
            api.endpoint(&["domains", "a b/c.com"]).unwrap().as_str(),
            "http://filter.lan:8080/domains/a%20b%2Fc.com"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let api = HttpApplianceApi::new("http://filter.lan/api/").unwrap();
        assert_eq!(
            api.endpoint(&["devices", "d1", "is_filtered"]).unwrap().as_str(),
            "http://filter.lan/api/devices/d1/is_filtered"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpApplianceApi::new("not a url"),
            Err(SyncError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpApplianceApi::new("mailto:admin@filter.lan"),
            Err(SyncError::InvalidUrl(_))
        ));
    }

    #[test]
    fn flag_wire_values() {
        assert_eq!(flag_wire_value(true), "True");
        assert_eq!(flag_wire_value(false), "False");
    }
}
