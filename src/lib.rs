//! # routeguide
//!
//! A gRPC route guide exercising all four call patterns:
//! - `GetFeature`: unary lookup of the feature at a point
//! - `ListFeatures`: server stream of the named features inside a rectangle
//! - `RecordRoute`: client stream of points, answered with a route summary
//! - `RouteChat`: bidirectional stream of notes shared between callers
//!
//! Coordinates are E7 integers (degrees × 10^7). The feature database is
//! loaded once at startup and never changes; the only shared mutable state is
//! the route-chat history.
//!
//! ## Usage
//!
//! ### Start the server
//! ```bash
//! routeguide-server serve --bind [::1]:10000 --db ./data/route_guide_db.json
//! ```
//!
//! ### Use the CLI
//! ```bash
//! routeguide get-feature --latitude 409146138 --longitude -746188906
//! routeguide list-features
//! routeguide record-route --points 10
//! routeguide route-chat --notes 6
//! ```

pub mod client;
pub mod common;
pub mod guide;

// Re-export commonly used types
pub use client::GuideClient;
pub use common::{Config, Error, Result};
pub use guide::{GuideServer, RouteGuideService};

// Generated protobuf code
pub mod proto {
    tonic::include_proto!("route_guide");
}

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
