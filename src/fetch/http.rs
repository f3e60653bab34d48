use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, redirect::Policy};
use std::time::Duration;

use super::PackageSource;
use crate::error::NetworkError;

/// Production update-service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://clients2.google.com/service/update2/crx";

/// Browser version reported in the `prodversion` query parameter. The update
/// service refuses requests claiming a version too old to handle CRX3.
pub const DEFAULT_PROD_VERSION: &str = "89.0.4389.82";

/// Redirect depth cap. The service normally answers with a single redirect
/// to a storage host; anything deeper is a loop.
const MAX_REDIRECTS: u32 = 10;

/// HTTP client for the extension update service.
///
/// Redirects are followed manually rather than through reqwest's built-in
/// policy so that a missing `Location` header and an over-deep chain map onto
/// distinct [`NetworkError`] variants.
pub struct UpdateClient {
    client: Client,
    endpoint: String,
    prod_version: String,
}

impl UpdateClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (used by tests and mirrors).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            prod_version: DEFAULT_PROD_VERSION.to_string(),
        })
    }

    /// Override the advertised browser version.
    pub fn prod_version(mut self, version: impl Into<String>) -> Self {
        self.prod_version = version.into();
        self
    }

    /// Build the update-service request URL for an extension ID.
    ///
    /// The `x` parameter is itself a URL-encoded key/value blob, so the inner
    /// `=` and `&` separators stay percent-encoded in the template.
    fn package_url(&self, extension_id: &str) -> String {
        format!(
            "{}?response=redirect&prodversion={}&acceptformat=crx2,crx3&x=id%3D{}%26installsource%3Dondemand%26uc",
            self.endpoint, self.prod_version, extension_id
        )
    }
}

#[async_trait]
impl PackageSource for UpdateClient {
    async fn fetch(&self, extension_id: &str) -> Result<Vec<u8>, NetworkError> {
        let mut url = reqwest::Url::parse(&self.package_url(extension_id)).map_err(|_| {
            NetworkError::BadRedirect {
                location: self.package_url(extension_id),
            }
        })?;

        let mut redirects = 0u32;

        loop {
            let resp = self.client.get(url.clone()).send().await?;
            let status = resp.status();

            if status.is_redirection() {
                // Follow the Location header manually; a 3xx without one is
                // reported like any other unexpected status.
                if let Some(location) = resp.headers().get(LOCATION) {
                    let location = location.to_str().map_err(|_| {
                        // Non-ASCII header bytes cannot name a valid target
                        NetworkError::BadRedirect {
                            location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
                        }
                    })?;
                    let next = resp.url().join(location).map_err(|_| {
                        NetworkError::BadRedirect {
                            location: location.to_string(),
                        }
                    })?;

                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(NetworkError::TooManyRedirects {
                            limit: MAX_REDIRECTS,
                        });
                    }

                    url = next;
                    continue;
                }
            }

            if status != StatusCode::OK {
                return Err(NetworkError::Status {
                    status: status.as_u16(),
                });
            }

            // Whole container into one contiguous buffer; extension packages
            // are small enough that streaming to disk is not worth it.
            let body = resp.bytes().await?;
            return Ok(body.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UpdateClient {
        UpdateClient::with_endpoint(format!("{}/service/update2/crx", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn fetches_body_on_direct_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/service/update2/crx"))
            .and(query_param("response", "redirect"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"container".to_vec()))
            .mount(&server)
            .await;

        let body = client_for(&server).fetch("aaaa").await.unwrap();
        assert_eq!(body, b"container");
    }

    #[tokio::test]
    async fn follows_redirect_to_package_host() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/service/update2/crx"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/storage/pkg.crx"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/storage/pkg.crx"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"redirected bytes".to_vec()))
            .mount(&server)
            .await;

        let body = client_for(&server).fetch("bbbb").await.unwrap();
        assert_eq!(body, b"redirected bytes");
    }

    #[tokio::test]
    async fn surfaces_http_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("cccc").await.unwrap_err();
        assert!(matches!(err, NetworkError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn redirect_without_location_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("dddd").await.unwrap_err();
        assert!(matches!(err, NetworkError::Status { status: 302 }));
    }

    #[tokio::test]
    async fn non_ascii_redirect_target_is_a_bad_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", &b"/caf\xc3\xa9/pkg.crx"[..]),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("ffff").await.unwrap_err();
        assert!(matches!(err, NetworkError::BadRedirect { .. }));
    }

    #[tokio::test]
    async fn redirect_loop_trips_the_depth_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/service/update2/crx"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("eeee").await.unwrap_err();
        assert!(matches!(err, NetworkError::TooManyRedirects { limit: 10 }));
    }

    #[test]
    fn request_url_matches_update_service_template() {
        let client = UpdateClient::with_endpoint("https://example.com/crx")
            .unwrap()
            .prod_version("120.0.0.0");
        assert_eq!(
            client.package_url("cfhdojbkjhnklbpkdaibdccddilifddb"),
            "https://example.com/crx?response=redirect&prodversion=120.0.0.0&acceptformat=crx2,crx3&x=id%3Dcfhdojbkjhnklbpkdaibdccddilifddb%26installsource%3Dondemand%26uc"
        );
    }
}
