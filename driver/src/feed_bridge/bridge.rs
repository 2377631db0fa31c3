use crate::export::svg::scene_to_svg;
use crate::feed_bridge::model::FeedModel;
use crate::generator::sample::{sample_feed, GeneratorConfig};
use crate::workflow::runner::Runner;
use mapcore::render::{ThemeConfig, ThemePreset};
use mapcore::{VisitFeed, VisitId};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedFeed = Arc<RwLock<FeedModel>>;

#[derive(Debug)]
struct GenerateError;

impl warp::reject::Reject for GenerateError {}

#[derive(Debug, Default, Deserialize)]
struct MapQuery {
    theme: Option<ThemePreset>,
    selected: Option<String>,
}

/// HTTP endpoint that serves the current visit feed to map hosts.
pub struct FeedBridge {
    state: SharedFeed,
    runner: Arc<Runner>,
    bind: SocketAddr,
}

impl FeedBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let bind = runner.config().bind;
        Self {
            state: Arc::new(RwLock::new(FeedModel::default())),
            runner,
            bind,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let get_visits = warp::path("visits")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedFeed| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&guard.feed)
            });

        let post_visits = warp::path("visits")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .map(|feed: VisitFeed, state: SharedFeed| {
                let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
                let revision = guard.replace(feed);
                log::info!(
                    "feed replaced: {} visits (revision {revision})",
                    guard.feed.len()
                );
                warp::reply::with_status(
                    warp::reply::json(&json!({
                        "status": "ok",
                        "total_count": guard.feed.total_count,
                    })),
                    StatusCode::OK,
                )
            });

        let generate = warp::path("generate")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and_then(|config: GeneratorConfig, state: SharedFeed| async move {
                match sample_feed(&config) {
                    Ok(feed) => {
                        let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
                        let revision = guard.replace(feed);
                        log::info!(
                            "generated {} visits with seed {} (revision {revision})",
                            config.count,
                            config.seed
                        );
                        Ok::<_, warp::Rejection>(warp::reply::with_status(
                            warp::reply::json(&json!({
                                "status": "ok",
                                "total_count": guard.feed.total_count,
                                "seed": config.seed,
                            })),
                            StatusCode::OK,
                        ))
                    }
                    Err(err) => {
                        log::error!("generate error: {err:#}");
                        Err(warp::reject::custom(GenerateError))
                    }
                }
            });

        let summary = warp::path("summary")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedFeed| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&guard.feed.summary())
            });

        let map_svg = warp::path("map.svg")
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<MapQuery>())
            .and(state_filter)
            .and(runner_filter)
            .map(|query: MapQuery, state: SharedFeed, runner: Arc<Runner>| {
                let feed = state
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .feed
                    .clone();
                let selected = query
                    .selected
                    .as_deref()
                    .and_then(|raw| raw.parse::<VisitId>().ok());
                let scene = match query.theme {
                    Some(preset) => runner.render_with_theme(
                        &feed,
                        selected.as_ref(),
                        &ThemeConfig::preset(preset),
                    ),
                    None => runner.render(&feed, selected.as_ref()),
                };
                warp::reply::with_header(scene_to_svg(&scene), "content-type", "image/svg+xml")
            });

        get_visits
            .or(post_visits)
            .or(generate)
            .or(summary)
            .or(map_svg)
    }

    /// Serves the routes on a background thread until the process exits.
    pub fn serve(&self) -> thread::JoinHandle<()> {
        let routes = self.routes();
        let bind = self.bind;
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("failed to build feed server runtime: {err}");
                    return;
                }
            };
            log::info!("serving visit feed on http://{bind}");
            runtime.block_on(async move {
                warp::serve(routes).run(bind).await;
            });
        })
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.bind
    }

    pub fn publish(&self, feed: VisitFeed) -> u64 {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let revision = guard.replace(feed);
        log::info!(
            "published {} visits (revision {revision})",
            guard.feed.len()
        );
        revision
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> FeedModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::MapConfig;
    use mapcore::visit::VisitSummary;
    use mapcore::VisitRecord;

    fn bridge() -> FeedBridge {
        FeedBridge::new(Arc::new(Runner::new(MapConfig::default())))
    }

    fn feed() -> VisitFeed {
        VisitFeed::new(vec![
            VisitRecord::new(1, "Book Cafe", 37.55, 126.92).with_category("cafe"),
            VisitRecord::new(2, "Hidden Garden", 37.57, 126.98).with_category("park"),
        ])
    }

    #[test]
    fn publish_updates_state() {
        let bridge = bridge();
        assert_eq!(bridge.publish(feed()), 1);
        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.feed.len(), 2);
    }

    #[tokio::test]
    async fn visits_round_trip_over_http() {
        let bridge = bridge();
        let routes = bridge.routes();

        let posted = warp::test::request()
            .method("POST")
            .path("/visits")
            .json(&feed())
            .reply(&routes)
            .await;
        assert_eq!(posted.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(posted.body()).unwrap();
        assert_eq!(body["total_count"], 2);

        let fetched = warp::test::request()
            .method("GET")
            .path("/visits")
            .reply(&routes)
            .await;
        let served: VisitFeed = serde_json::from_slice(fetched.body()).unwrap();
        assert_eq!(served, feed());

        let summary = warp::test::request()
            .method("GET")
            .path("/summary")
            .reply(&routes)
            .await;
        let summary: VisitSummary = serde_json::from_slice(summary.body()).unwrap();
        assert_eq!(summary.total_visits, 2);
        assert_eq!(summary.categories.len(), 2);
    }

    #[tokio::test]
    async fn generate_replaces_feed() {
        let bridge = bridge();
        bridge.publish(feed());
        let routes = bridge.routes();

        let response = warp::test::request()
            .method("POST")
            .path("/generate")
            .json(&json!({ "count": 5, "seed": 3 }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.feed.len(), 5);
        assert_eq!(snapshot.revision, 2);
    }

    #[tokio::test]
    async fn map_svg_renders_selected_visit() {
        let bridge = bridge();
        bridge.publish(feed());
        let routes = bridge.routes();

        let response = warp::test::request()
            .method("GET")
            .path("/map.svg?theme=light&selected=2")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/svg+xml");
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("Hidden Garden"));
        assert!(!body.contains("Book Cafe"));
    }
}
