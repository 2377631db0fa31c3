use anyhow::Context;
use clap::Parser;
use export::svg::write_svg;
use feed_bridge::bridge::FeedBridge;
use generator::sample::{sample_feed, GeneratorConfig};
use mapcore::geometry::Point;
use mapcore::interaction::SelectionState;
use mapcore::render::ThemePreset;
use mapcore::VisitId;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{MapConfig, ThemeSetting};
use workflow::input::load_feed;
use workflow::runner::Runner;

mod export;
mod feed_bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Exploration map driver: render, replay clicks, serve visits")]
struct Args {
    /// Visits to load (JSON envelope/list, or YAML); generated when omitted
    #[arg(long)]
    visits: Option<PathBuf>,
    /// Load a map config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    theme: Option<ThemePreset>,
    #[arg(long)]
    width: Option<f32>,
    #[arg(long)]
    height: Option<f32>,
    #[arg(long)]
    pixel_ratio: Option<f32>,
    /// Visit id selected before any click
    #[arg(long, value_parser = parse_visit_id)]
    select: Option<VisitId>,
    /// Canvas-local click to replay, as X,Y (repeatable)
    #[arg(long = "click", value_parser = parse_point)]
    clicks: Vec<Point>,
    /// Write the final frame as SVG
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Number of generated visits when no file is given
    #[arg(long, default_value_t = 8)]
    count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the visit feed server alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

/// Numeric ids stay numeric so they match integer ids from feeds.
fn parse_visit_id(raw: &str) -> Result<VisitId, String> {
    if raw.trim().is_empty() {
        return Err("visit id must not be empty".into());
    }
    raw.parse::<VisitId>().map_err(|err| match err {})
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let x: f32 = x.trim().parse().map_err(|err| format!("bad x '{x}': {err}"))?;
    let y: f32 = y.trim().parse().map_err(|err| format!("bad y '{y}': {err}"))?;
    Ok(Point::new(x, y))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };
    if let Some(theme) = args.theme {
        config.theme = ThemeSetting::Preset(theme);
    }
    if let Some(width) = args.width {
        config.canvas.width = width;
    }
    if let Some(height) = args.height {
        config.canvas.height = height;
    }
    if let Some(pixel_ratio) = args.pixel_ratio {
        config.canvas.pixel_ratio = pixel_ratio;
    }
    config.validate().context("validating command-line overrides")?;

    let feed = match &args.visits {
        Some(path) => load_feed(path)?,
        None => sample_feed(&GeneratorConfig {
            count: args.count,
            seed: args.seed,
            ..Default::default()
        })
        .context("generating sample visits")?,
    };

    let summary = feed.summary();
    println!(
        "Visits {} | xp {} | spent {} | minutes {}",
        summary.total_visits, summary.total_xp, summary.total_spent, summary.total_duration_minutes
    );
    for share in &summary.categories {
        println!("  {:<14} {:>3} ({}%)", share.name, share.count, share.pct);
    }

    let runner = Arc::new(Runner::new(config));
    let mut selection = SelectionState::new();
    if let Some(id) = args.select {
        if feed.find(&id).is_none() {
            log::warn!("selected visit {id} is not in the feed");
        }
        selection.set(Some(id));
    }

    for point in &args.clicks {
        let outcome = runner.click(&feed, &mut selection, *point);
        let target = outcome
            .selected
            .as_ref()
            .and_then(|id| feed.find(id))
            .map(|visit| format!("{} ({})", visit.place_name, visit.id))
            .unwrap_or_else(|| "nothing".into());
        match outcome.geo {
            Some((lat, lon)) => println!(
                "Click ({:.1}, {:.1}) ~ {lat:.5}, {lon:.5} -> {target}",
                point.x, point.y
            ),
            None => println!("Click ({:.1}, {:.1}) -> {target}", point.x, point.y),
        }
    }

    let scene = runner.render(&feed, selection.selected());
    let (backing_width, backing_height) = scene.viewport().backing_size();
    println!(
        "Frame {}x{} (backing {backing_width}x{backing_height}) -> markers {}, commands {}",
        scene.viewport().width,
        scene.viewport().height,
        scene.markers().len(),
        scene.commands().len()
    );
    if let Some(path) = &args.svg {
        write_svg(&scene, path)?;
        println!("SVG written to {}", path.display());
    }

    let metrics = runner.metrics();
    println!(
        "Metrics -> frames {}, clicks {}, hits {}, misses {}",
        metrics.frames, metrics.clicks, metrics.hits, metrics.misses
    );

    if args.serve {
        let bridge = FeedBridge::new(runner.clone());
        bridge.publish(feed);
        bridge.serve();
        println!(
            "Visit feed on http://{} (Ctrl+C to stop)...",
            bridge.bind_address()
        );
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_click_points() {
        assert_eq!(parse_point("12.5, 40").unwrap(), Point::new(12.5, 40.0));
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn args_accept_repeated_clicks_and_theme() {
        let args = Args::try_parse_from([
            "mapdriver", "--theme", "light", "--click", "10,20", "--click", "30,40", "--select",
            "7",
        ])
        .unwrap();
        assert_eq!(args.theme, Some(ThemePreset::Light));
        assert_eq!(args.clicks.len(), 2);
        assert_eq!(args.select, Some(VisitId::from(7)));
    }

    #[test]
    fn select_keeps_text_ids_as_text() {
        let args = Args::try_parse_from(["mapdriver", "--select", "cafe-12"]).unwrap();
        assert_eq!(args.select, Some(VisitId::from("cafe-12")));
        assert_eq!(parse_visit_id(" 42 ").unwrap(), VisitId::Number(42));
        assert!(parse_visit_id("  ").is_err());
    }
}
