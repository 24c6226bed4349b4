//! CLI tool to drive a simulated delivery run against the route server.
//!
//! Plots the given stops, requests the route, then follows a straight-line
//! drive through every stop, confirming each arrival prompt.

use anyhow::Result;
use clap::Parser;
use route_cli::sim::{parse_coordinate, DrivePath, RouteClient};
use route_core::{offset_by_meters, Coordinate, RoutePhase};
use std::thread;
use std::time::Duration;

/// Drive a simulated vehicle through delivery stops
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Route server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Stop as LAT,LON (repeat for up to five stops)
    #[arg(long = "stop", value_parser = parse_stop, required = true)]
    stops: Vec<Coordinate>,

    /// Start position as LAT,LON (default: 1km south of the first stop)
    #[arg(long, value_parser = parse_stop)]
    start: Option<Coordinate>,

    /// Driving speed in meters per second
    #[arg(long, default_value_t = 15.0, value_parser = parse_positive)]
    speed: f64,

    /// Update rate in Hz
    #[arg(long, default_value_t = 1.0, value_parser = parse_positive)]
    rate: f64,

    /// Simulated seconds per real second
    #[arg(long, default_value_t = 10.0, value_parser = parse_positive)]
    time_scale: f64,

    /// Decline the first prompt at each stop before accepting
    #[arg(long)]
    decline_first: bool,
}

fn parse_stop(s: &str) -> Result<Coordinate, String> {
    parse_coordinate(s).map_err(|e| format!("{e:#}"))
}

fn parse_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number, got {value}"))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let client = RouteClient::new(&args.url);

    println!("Connecting to route server at {}...", args.url);
    client.clear_route()?;

    for stop in &args.stops {
        let waypoint = client.add_waypoint(stop)?;
        println!("Added stop: {} ({})", waypoint.short_label(), waypoint.id);
    }

    let start = args
        .start
        .unwrap_or_else(|| offset_by_meters(&args.stops[0], -1000.0, 0.0));
    client.request_route(&start)?;

    let path = DrivePath::new(start, &args.stops, args.speed);
    println!("Starting drive through {} stop(s)", args.stops.len());
    println!("  Distance: {:.0}m at {}m/s ({:.0}s)", path.distance_m, args.speed, path.duration);
    println!("  Update rate: {}Hz, time scale x{}", args.rate, args.time_scale);
    println!();

    let tick = Duration::from_secs_f64(1.0 / args.rate);
    let sim_step = args.time_scale / args.rate;
    let mut t = 0.0;
    let mut update_count = 0u32;
    let mut declined = Vec::new();

    // Run a little past the end so the last stop is sampled a few times.
    while t <= path.duration + 5.0 * sim_step {
        let Some(position) = path.get_position(t) else {
            break;
        };

        match client.send_position(&position) {
            Ok(202) => update_count += 1,
            Ok(status) => eprintln!(
                "Position ({:.6}, {:.6}) -> {}",
                position.latitude, position.longitude, status
            ),
            Err(e) => eprintln!("Error sending position: {}", e),
        }

        thread::sleep(tick);
        t += sim_step;

        let view = client.route()?;
        if let Some(prompt) = view.prompt {
            let id = prompt.waypoint.id;
            let accept = !args.decline_first || declined.contains(&id);
            if !accept {
                declined.push(id);
            }
            println!(
                "[{:3}] Arriving at {} ({:.0}m) -> {}",
                update_count,
                prompt.waypoint.short_label(),
                prompt.distance_m,
                if accept { "complete" } else { "not yet" }
            );
            let view = client.resolve_prompt(accept)?;
            if matches!(view.phase, RoutePhase::Finished { .. }) {
                break;
            }
        }
    }

    let view = client.route()?;
    if view.finished {
        let summary = client.report_journey()?;
        println!(
            "\nAll items delivered: {} stop(s), {} breadcrumb point(s), {} position update(s).",
            summary.stops.len(),
            summary.breadcrumb_points,
            update_count
        );
    } else {
        let pending = view.waypoints.iter().filter(|w| w.waypoint.is_pending()).count();
        println!("\nDrive ended with {} stop(s) still pending.", pending);
    }

    Ok(())
}
