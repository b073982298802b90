//! Route guide service
//!
//! The server side of `route_guide.RouteGuide`:
//! - Feature store (read-only, loaded once)
//! - Route recorder for RecordRoute summaries
//! - Chat relay shared by every RouteChat call
//! - gRPC handler and server runner

pub mod grpc;
pub mod relay;
pub mod route;
pub mod server;
pub mod store;

pub use grpc::RouteGuideService;
pub use relay::ChatRelay;
pub use route::RouteRecorder;
pub use server::GuideServer;
pub use store::FeatureStore;
