//! Door transitions: asking an external collaborator where a door leads.
//!
//! The request carries the current URL, the maze seed and the door's hash. The response
//! names a redirect; `redirect_url` wins over `url`. Without a real service the
//! [`MockDoorTransition`] waits a moment and sends the player back to the current page.

use crate::error::{MazeError, Result};
use crate::game::collision::DoorHit;
use crate::maze::doors::door_hash;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Delay the mock waits before answering.
pub const MOCK_TRANSITION_DELAY: Duration = Duration::from_millis(1000);

/// Body sent when the player walks into a door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorRequest {
    pub url: String,
    pub maze_seed: u32,
    pub door_hash: String,
}

impl DoorRequest {
    pub fn new(url: impl Into<String>, maze_seed: u32, door_hash: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            maze_seed,
            door_hash: door_hash.into(),
        }
    }

    /// Builds the request for a door the player collided with.
    pub fn for_hit(url: impl Into<String>, maze_seed: u32, hit: &DoorHit) -> Self {
        Self::new(url, maze_seed, door_hash(hit.center))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body returned by the transition service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DoorResponse {
    /// Parses a JSON response body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// The URL to navigate to: `redirect_url`, else `url`.
    pub fn into_redirect(self) -> Result<String> {
        self.redirect_url
            .or(self.url)
            .filter(|target| !target.is_empty())
            .ok_or(MazeError::MissingRedirect)
    }
}

/// Something that can turn a [`DoorRequest`] into a redirect target.
///
/// A failure leaves the maze untouched; the caller decides whether to retry.
pub trait DoorTransition {
    fn request_redirect(&self, request: &DoorRequest)
    -> impl Future<Output = Result<String>> + Send;
}

/// Scheme, host and path of `url`, with any query string and fragment dropped.
pub fn base_url(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Stand-in transition service: sleeps, then points back at the current page.
#[derive(Debug, Clone, Copy)]
pub struct MockDoorTransition {
    pub delay: Duration,
}

impl Default for MockDoorTransition {
    fn default() -> Self {
        Self {
            delay: MOCK_TRANSITION_DELAY,
        }
    }
}

impl MockDoorTransition {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl DoorTransition for MockDoorTransition {
    fn request_redirect(
        &self,
        request: &DoorRequest,
    ) -> impl Future<Output = Result<String>> + Send {
        let delay = self.delay;
        let target = base_url(&request.url).to_string();
        let hash = request.door_hash.clone();
        let seed = request.maze_seed;
        async move {
            debug!("mock transition for door {hash} (seed {seed}), waiting {delay:?}");
            tokio::time::sleep(delay).await;
            let response = DoorResponse {
                redirect_url: Some(target),
                url: None,
            };
            let redirect = response.into_redirect()?;
            info!("door {hash} redirects to {redirect}");
            Ok(redirect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coordinates::Direction;
    use crate::maze::doors::DoorDescriptor;
    use crate::maze::generator::CellPos;

    #[test]
    fn request_serialises_expected_fields() {
        let request = DoorRequest::new("https://example.org/maze", 42, "00ff00ff00ff00ff");
        let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(value["url"], "https://example.org/maze");
        assert_eq!(value["maze_seed"], 42);
        assert_eq!(value["door_hash"], "00ff00ff00ff00ff");
    }

    #[test]
    fn request_for_hit_uses_door_center_hash() {
        let door = DoorDescriptor::new(CellPos::new(2, 2), Direction::North);
        let hit = DoorHit {
            door,
            distance: 0.5,
            center: door.segment(4.0).center(),
        };
        let request = DoorRequest::for_hit("https://example.org/", 7, &hit);
        assert_eq!(request.door_hash, door.segment(4.0).hash());
    }

    #[test]
    fn redirect_url_is_preferred() {
        let response =
            DoorResponse::from_json(r#"{"redirect_url": "https://a.test/", "url": "https://b.test/"}"#)
                .unwrap();
        assert_eq!(response.into_redirect().unwrap(), "https://a.test/");
    }

    #[test]
    fn url_is_the_fallback() {
        let response = DoorResponse::from_json(r#"{"url": "https://b.test/"}"#).unwrap();
        assert_eq!(response.into_redirect().unwrap(), "https://b.test/");
    }

    #[test]
    fn missing_redirect_is_an_error() {
        let response = DoorResponse::from_json("{}").unwrap();
        assert!(matches!(response.into_redirect(), Err(MazeError::MissingRedirect)));
        assert!(matches!(
            DoorResponse::from_json("not json"),
            Err(MazeError::Serialization(_))
        ));
    }

    #[test]
    fn base_url_strips_query_and_fragment() {
        assert_eq!(base_url("https://example.org/maze?seed=4#top"), "https://example.org/maze");
        assert_eq!(base_url("https://example.org/maze#top"), "https://example.org/maze");
        assert_eq!(base_url("https://example.org/"), "https://example.org/");
    }

    #[tokio::test]
    async fn mock_returns_base_url() {
        let mock = MockDoorTransition::with_delay(Duration::from_millis(5));
        let request = DoorRequest::new("https://example.org/maze?x=1", 42, "abc");
        let redirect = mock.request_redirect(&request).await.unwrap();
        assert_eq!(redirect, "https://example.org/maze");
    }

    #[tokio::test(start_paused = true)]
    async fn mock_waits_its_delay() {
        let mock = MockDoorTransition::default();
        let request = DoorRequest::new("https://example.org/", 1, "abc");
        let started = tokio::time::Instant::now();
        mock.request_redirect(&request).await.unwrap();
        assert!(started.elapsed() >= MOCK_TRANSITION_DELAY);
    }
}
