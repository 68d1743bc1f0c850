//! HTTP access to a running server's admin API, used where the caller does not
//! own the database (the seed tool, remote dashboards).

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::auth::{LoginRequest, SessionToken};
use crate::models::{Course, CourseDetails, CoursePage, Entity};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base url {0}")]
    InvalidUrl(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Clone, Debug)]
pub struct AdminClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl AdminClient {
    /// Log in against `base_url` and keep the issued token for later requests.
    pub async fn login(base_url: &str, email: &str, password: &str) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        let base_url = parse_base(base_url)?;

        let url = endpoint(&base_url, &["api", "admin", "login"])?;
        let response = client
            .post(url)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let session: SessionToken = decode(response).await?;

        Ok(Self {
            client,
            base_url,
            token: session.token,
        })
    }

    pub fn with_token(base_url: &str, token: String) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: parse_base(base_url)?,
            token,
        })
    }

    /// `/api/admin/<segments...>`, each segment percent-encoded.
    fn admin_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut path = vec!["api", "admin"];
        path.extend_from_slice(segments);
        endpoint(&self.base_url, &path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        let url = self.admin_url(&[E::COLLECTION])?;
        debug!("GET {}", url);
        let response = self.authed(self.client.get(url)).send().await?;
        decode(response).await
    }

    pub async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, ClientError> {
        let url = self.admin_url(&[E::COLLECTION, id])?;
        debug!("GET {}", url);
        let response = self.authed(self.client.get(url)).send().await?;
        decode_optional(response).await
    }

    pub async fn create<E: Entity>(&self, new: &E::New) -> Result<E, ClientError> {
        let url = self.admin_url(&[E::COLLECTION])?;
        debug!("POST {}", url);
        let response = self.authed(self.client.post(url)).json(new).send().await?;
        decode(response).await
    }

    pub async fn update<E: Entity>(
        &self,
        id: &str,
        patch: &E::Patch,
    ) -> Result<Option<E>, ClientError> {
        let url = self.admin_url(&[E::COLLECTION, id])?;
        debug!("PATCH {}", url);
        let response = self.authed(self.client.patch(url)).json(patch).send().await?;
        decode_optional(response).await
    }

    pub async fn delete<E: Entity>(&self, id: &str) -> Result<bool, ClientError> {
        let url = self.admin_url(&[E::COLLECTION, id])?;
        debug!("DELETE {}", url);
        let response = self.authed(self.client.delete(url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(status_error(status, response).await),
        }
    }

    pub async fn course_by_slug(&self, slug: &str) -> Result<Option<Course>, ClientError> {
        let url = endpoint(&self.base_url, &["api", "courses", slug])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let page: Option<CoursePage> = decode_optional(response).await?;
        Ok(page.map(|p| p.course))
    }

    pub async fn details_for_course(
        &self,
        course_id: &str,
    ) -> Result<Option<CourseDetails>, ClientError> {
        let url = self.admin_url(&["courses", course_id, "details"])?;
        debug!("GET {}", url);
        let response = self.authed(self.client.get(url)).send().await?;
        decode_optional(response).await
    }
}

fn parse_base(base_url: &str) -> Result<Url, ClientError> {
    let url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl(base_url.to_string()));
    }
    Ok(url)
}

fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, response).await);
    }
    Ok(response.json::<T>().await?)
}

async fn decode_optional<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ClientError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    decode(response).await.map(Some)
}

async fn status_error(status: StatusCode, response: Response) -> ClientError {
    let body = response.text().await.unwrap_or_default();
    ClientError::Status {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_percent_encoded() {
        let base = parse_base("http://127.0.0.1:3000").unwrap();
        let url = endpoint(&base, &["api", "courses", "c++/intro?x#y"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/courses/c++%2Fintro%3Fx%23y");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = parse_base("https://example.edu/portal/").unwrap();
        let url = endpoint(&base, &["api", "admin", "courses"]).unwrap();
        assert_eq!(url.as_str(), "https://example.edu/portal/api/admin/courses");
    }

    #[test]
    fn unusable_base_is_rejected() {
        assert!(matches!(parse_base("not a url"), Err(ClientError::InvalidUrl(_))));
        assert!(matches!(
            parse_base("mailto:officers@example.edu"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
