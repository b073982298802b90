//! RouteGuide gRPC service
//!
//! Implements the four call patterns of the `route_guide.RouteGuide` service
//! on top of the feature store, the route recorder and the chat relay.
//! Requests with coordinates outside the E7 ranges fail with
//! `InvalidArgument`; nothing is retried here.

use crate::common::{geo, Error};
use crate::guide::relay::ChatRelay;
use crate::guide::route::RouteRecorder;
use crate::guide::store::FeatureStore;
use crate::proto::route_guide_server::{RouteGuide, RouteGuideServer};
use crate::proto::{Feature, Point, Rectangle, RouteNote, RouteSummary};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};
use tracing::Instrument;
use uuid::Uuid;

/// Outbound half of a RouteChat call.
pub type NoteStream = Pin<Box<dyn Stream<Item = Result<RouteNote, Status>> + Send + 'static>>;

/// Default capacity of the channel feeding a ListFeatures call.
pub const DEFAULT_STREAM_BUFFER: usize = 4;

/// RouteGuideService answers RouteGuide calls. Cloning shares the store and relay.
#[derive(Clone)]
pub struct RouteGuideService {
    store: Arc<FeatureStore>,
    relay: Arc<ChatRelay>,
    stream_buffer: usize,
}

impl RouteGuideService {
    pub fn new(store: Arc<FeatureStore>, relay: Arc<ChatRelay>) -> Self {
        Self {
            store,
            relay,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    /// Set the ListFeatures channel capacity (at least 1).
    pub fn with_stream_buffer(mut self, stream_buffer: usize) -> Self {
        self.stream_buffer = stream_buffer.max(1);
        self
    }

    /// Converts this service into a gRPC server instance.
    pub fn into_server(self) -> RouteGuideServer<Self> {
        RouteGuideServer::new(self)
    }
}

/// Log a failed call and turn it into the status sent to the caller.
fn reject(call: &str, e: Error) -> Status {
    if e.is_client_error() {
        tracing::warn!("{} rejected: {}", call, e);
    } else {
        tracing::error!("{} failed: {}", call, e);
    }
    e.to_grpc_status()
}

#[tonic::async_trait]
impl RouteGuide for RouteGuideService {
    /// Unnamed feature when nothing is stored at the point.
    async fn get_feature(&self, req: Request<Point>) -> Result<Response<Feature>, Status> {
        let point = req.into_inner();
        geo::validate_point(&point).map_err(|e| reject("GetFeature", e))?;

        let feature = self.store.get_feature(&point);
        tracing::debug!(
            latitude = point.latitude,
            longitude = point.longitude,
            found = !feature.name.is_empty(),
            "GetFeature"
        );
        Ok(Response::new(feature))
    }

    type ListFeaturesStream = ReceiverStream<Result<Feature, Status>>;

    async fn list_features(
        &self,
        req: Request<Rectangle>,
    ) -> Result<Response<Self::ListFeaturesStream>, Status> {
        let bounds =
            geo::validate_rectangle(req.get_ref()).map_err(|e| reject("ListFeatures", e))?;

        let (tx, rx) = mpsc::channel(self.stream_buffer);
        let store = self.store.clone();
        let span = tracing::debug_span!("list_features", call_id = %Uuid::new_v4());

        tokio::spawn(
            async move {
                let mut sent = 0usize;
                for feature in store.list_in_bounds(bounds) {
                    // The receiver is gone once the caller cancels
                    if tx.send(Ok(feature.clone())).await.is_err() {
                        tracing::debug!("ListFeatures cancelled after {} features", sent);
                        return;
                    }
                    sent += 1;
                }
                tracing::debug!("ListFeatures sent {} features", sent);
            }
            .instrument(span),
        );

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn record_route(
        &self,
        req: Request<Streaming<Point>>,
    ) -> Result<Response<RouteSummary>, Status> {
        let mut points = req.into_inner();
        let mut recorder = RouteRecorder::new(&self.store);

        while let Some(point) = points.next().await {
            let point = point?;
            recorder
                .record(point)
                .map_err(|e| reject("RecordRoute", e))?;
        }

        let summary = recorder.finish();
        tracing::debug!(
            points = summary.point_count,
            features = summary.feature_count,
            distance = summary.distance,
            elapsed = summary.elapsed_time,
            "RecordRoute finished"
        );
        Ok(Response::new(summary))
    }

    type RouteChatStream = NoteStream;

    async fn route_chat(
        &self,
        req: Request<Streaming<RouteNote>>,
    ) -> Result<Response<Self::RouteChatStream>, Status> {
        let mut inbound = req.into_inner();
        let relay = self.relay.clone();
        let call_id = Uuid::new_v4();
        tracing::debug!(%call_id, "RouteChat opened");

        let output = async_stream::stream! {
            while let Some(note) = inbound.next().await {
                let note = match note {
                    Ok(note) => note,
                    Err(status) => {
                        tracing::debug!(%call_id, "RouteChat inbound ended: {}", status);
                        yield Err(status);
                        break;
                    }
                };

                match relay.publish(note) {
                    Ok(previous) => {
                        for prior in previous {
                            yield Ok(prior);
                        }
                    }
                    Err(e) => {
                        yield Err(reject("RouteChat", e));
                        break;
                    }
                }
            }
            tracing::debug!(%call_id, "RouteChat closed");
        };

        Ok(Response::new(Box::pin(output) as Self::RouteChatStream))
    }
}
