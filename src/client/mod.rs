//! Typed client for the RouteGuide service

use crate::common::geo::{MAX_LATITUDE, MAX_LONGITUDE};
use crate::common::Result;
use crate::proto::route_guide_client::RouteGuideClient;
use crate::proto::*;
use rand::Rng;
use tokio_stream::{Stream, StreamExt};
use tonic::transport::{Channel, Endpoint};
use tonic::Streaming;

pub struct GuideClient {
    client: RouteGuideClient<Channel>,
}

impl GuideClient {
    /// Connect to a server, e.g. `http://[::1]:10000`.
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let channel = Endpoint::from_shared(addr.into())?.connect().await?;
        Ok(Self {
            client: RouteGuideClient::new(channel),
        })
    }

    pub async fn get_feature(&mut self, point: Point) -> Result<Feature> {
        let response = self.client.get_feature(tonic::Request::new(point)).await?;
        Ok(response.into_inner())
    }

    /// Open a ListFeatures stream.
    pub async fn list_features(&mut self, rect: Rectangle) -> Result<Streaming<Feature>> {
        let response = self.client.list_features(tonic::Request::new(rect)).await?;
        Ok(response.into_inner())
    }

    /// Drain a ListFeatures stream.
    pub async fn collect_features(&mut self, rect: Rectangle) -> Result<Vec<Feature>> {
        let mut stream = self.list_features(rect).await?;
        let mut features = Vec::new();
        while let Some(feature) = stream.message().await? {
            features.push(feature);
        }
        Ok(features)
    }

    pub async fn record_route<S>(&mut self, points: S) -> Result<RouteSummary>
    where
        S: Stream<Item = Point> + Send + 'static,
    {
        let response = self.client.record_route(points).await?;
        Ok(response.into_inner())
    }

    /// Open a RouteChat call sending `notes`; replies arrive on the returned stream.
    pub async fn route_chat<S>(&mut self, notes: S) -> Result<Streaming<RouteNote>>
    where
        S: Stream<Item = RouteNote> + Send + 'static,
    {
        let response = self.client.route_chat(notes).await?;
        Ok(response.into_inner())
    }

    /// Send `notes` and collect every reply until the server closes the call.
    pub async fn chat(&mut self, notes: Vec<RouteNote>) -> Result<Vec<RouteNote>> {
        let mut inbound = self.route_chat(tokio_stream::iter(notes)).await?;
        let mut replies = Vec::new();
        while let Some(note) = inbound.next().await {
            replies.push(note?);
        }
        Ok(replies)
    }
}

/// A uniformly random point anywhere on the globe.
pub fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
    Point {
        latitude: rng.gen_range(-MAX_LATITUDE..=MAX_LATITUDE),
        longitude: rng.gen_range(-MAX_LONGITUDE..=MAX_LONGITUDE),
    }
}
