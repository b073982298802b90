//! CLI exercising each RouteGuide call

use clap::{Parser, Subcommand};
use routeguide::client::random_point;
use routeguide::proto::{Point, Rectangle, RouteNote};
use routeguide::GuideClient;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "routeguide")]
#[command(about = "Route guide gRPC client")]
#[command(version)]
struct Cli {
    /// Server URL
    #[arg(long, default_value = "http://[::1]:10000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the feature at a point (unary)
    GetFeature {
        /// Latitude, E7
        #[arg(long, allow_hyphen_values = true, default_value = "409146138")]
        latitude: i32,

        /// Longitude, E7
        #[arg(long, allow_hyphen_values = true, default_value = "-746188906")]
        longitude: i32,
    },

    /// Stream the named features inside a rectangle (server streaming)
    ListFeatures {
        #[arg(long, allow_hyphen_values = true, default_value = "400000000")]
        lo_latitude: i32,

        #[arg(long, allow_hyphen_values = true, default_value = "-750000000")]
        lo_longitude: i32,

        #[arg(long, allow_hyphen_values = true, default_value = "420000000")]
        hi_latitude: i32,

        #[arg(long, allow_hyphen_values = true, default_value = "-730000000")]
        hi_longitude: i32,
    },

    /// Send a random route and print its summary (client streaming)
    RecordRoute {
        /// Number of points
        #[arg(long, default_value = "10")]
        points: usize,
    },

    /// Exchange notes with other travellers (bidirectional streaming)
    RouteChat {
        /// Number of notes to send
        #[arg(long, default_value = "6")]
        notes: usize,

        /// Delay between notes
        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },
}

/// Notes rotate over these (latitude, longitude) pairs so later notes
/// replay earlier ones.
const CHAT_LOCATIONS: [(i32, i32); 3] = [
    (409_146_138, -746_188_906),
    (407_838_351, -746_143_763),
    (413_628_156, -749_015_468),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut client = GuideClient::connect(cli.server.clone()).await?;

    match cli.command {
        Commands::GetFeature {
            latitude,
            longitude,
        } => {
            let feature = client
                .get_feature(Point {
                    latitude,
                    longitude,
                })
                .await?;
            if feature.name.is_empty() {
                println!("No feature at ({}, {})", latitude, longitude);
            } else {
                println!("Feature: {}", feature.name);
            }
        }

        Commands::ListFeatures {
            lo_latitude,
            lo_longitude,
            hi_latitude,
            hi_longitude,
        } => {
            let rect = Rectangle {
                lo: Some(Point {
                    latitude: lo_latitude,
                    longitude: lo_longitude,
                }),
                hi: Some(Point {
                    latitude: hi_latitude,
                    longitude: hi_longitude,
                }),
            };
            let mut stream = client.list_features(rect).await?;
            let mut count = 0;
            while let Some(feature) = stream.message().await? {
                let location = feature.location.unwrap_or_default();
                println!(
                    "  {} ({}, {})",
                    feature.name, location.latitude, location.longitude
                );
                count += 1;
            }
            println!("{} features", count);
        }

        Commands::RecordRoute { points } => {
            let mut rng = rand::thread_rng();
            let route: Vec<Point> = (0..points).map(|_| random_point(&mut rng)).collect();
            println!("Traversing {} points", route.len());

            let summary = client.record_route(tokio_stream::iter(route)).await?;
            println!("Route summary:");
            println!("  Points: {}", summary.point_count);
            println!("  Features: {}", summary.feature_count);
            println!("  Distance: {} m", summary.distance);
            println!("  Elapsed: {} s", summary.elapsed_time);
        }

        Commands::RouteChat { notes, interval_ms } => {
            let outbound = async_stream::stream! {
                let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
                for i in 0..notes {
                    interval.tick().await;
                    let (latitude, longitude) = CHAT_LOCATIONS[i % CHAT_LOCATIONS.len()];
                    yield RouteNote {
                        location: Some(Point { latitude, longitude }),
                        message: format!("note {}", i + 1),
                    };
                }
            };

            let mut inbound = client.route_chat(outbound).await?;
            while let Some(note) = inbound.message().await? {
                let location = note.location.unwrap_or_default();
                println!(
                    "Got \"{}\" at ({}, {})",
                    note.message, location.latitude, location.longitude
                );
            }
        }
    }

    Ok(())
}
