use iced::{
    time,
    widget::{button, canvas::Cache, column, row, scrollable, text, Canvas, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use map_view::MapCanvas;
use mapcore::geometry::Viewport;
use mapcore::interaction::SelectionState;
use mapcore::render::{FrameKey, RedrawTracker, ThemeConfig, ThemePreset};
use mapcore::{ExplorationMapRenderer, RenderOptions, VisitFeed, VisitId};
use serde::Serialize;
use std::time::Duration;

mod map_view;

const MAP_HEIGHT: f32 = 280.0;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Exploration Map".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(2)).map(|_| Message::Tick)
}

fn application_theme(state: &Visualizer) -> Theme {
    match state.preset {
        ThemePreset::Dark => Theme::Dark,
        ThemePreset::Light => Theme::Light,
    }
}

fn feed_url() -> String {
    std::env::var("MAP_FEED_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".into())
}

struct Visualizer {
    map: ExplorationMapRenderer,
    feed: VisitFeed,
    selection: SelectionState,
    preset: ThemePreset,
    theme: ThemeConfig,
    viewport: Viewport,
    cache: Cache,
    redraw: RedrawTracker,
    next_seed: u64,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    FeedFetched(Result<VisitFeed, String>),
    SelectionChanged(Option<VisitId>),
    MapResized(f32, f32),
    ToggleTheme,
    Generate,
    Generated(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let options = RenderOptions {
            legend: Some("Visits in order, newest last".into()),
            ..RenderOptions::default()
        };
        (
            Visualizer {
                map: ExplorationMapRenderer::new(options),
                feed: VisitFeed::default(),
                selection: SelectionState::new(),
                preset: ThemePreset::Dark,
                theme: ThemeConfig::dark(),
                viewport: Viewport::new(0.0, MAP_HEIGHT),
                cache: Cache::new(),
                redraw: RedrawTracker::new(),
                next_seed: 1,
                status: "Waiting for visits...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_feed(), Message::FeedFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => return Task::perform(fetch_feed(), Message::FeedFetched),
            Message::FeedFetched(Ok(feed)) => {
                if feed != state.feed {
                    state.status = format!("{} visits loaded", feed.len());
                    state.push_history(format!("Feed: {} visits", feed.len()));
                    state.feed = feed;
                    let stale = state
                        .selection
                        .selected()
                        .is_some_and(|id| state.feed.find(id).is_none());
                    if stale {
                        state.selection.clear();
                    }
                }
            }
            Message::FeedFetched(Err(err)) => {
                state.status = format!("Feed error: {err}");
            }
            Message::SelectionChanged(selection) => {
                let label = selection
                    .as_ref()
                    .and_then(|id| state.feed.find(id))
                    .map(|visit| visit.place_name.clone())
                    .unwrap_or_else(|| "none".into());
                if state.selection.set(selection) {
                    state.push_history(format!("Selected: {label}"));
                }
            }
            Message::MapResized(width, height) => {
                state.viewport = Viewport::new(width, height);
            }
            Message::ToggleTheme => {
                state.preset = state.preset.toggled();
                state.theme = ThemeConfig::preset(state.preset);
            }
            Message::Generate => {
                let seed = state.next_seed;
                state.next_seed += 1;
                return Task::perform(post_generate(seed), Message::Generated);
            }
            Message::Generated(Ok(message)) => {
                state.status = message;
                return Task::perform(fetch_feed(), Message::FeedFetched);
            }
            Message::Generated(Err(err)) => {
                state.status = format!("Generate error: {err}");
            }
        }
        state.invalidate();
        Task::none()
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let map = Canvas::new(MapCanvas {
            visits: &state.feed.visits,
            selection: state.selection.selected(),
            theme: &state.theme,
            viewport: state.viewport,
            map: &state.map,
            cache: &state.cache,
        })
        .width(Length::Fill)
        .height(Length::Fixed(MAP_HEIGHT));

        let theme_label = match state.preset {
            ThemePreset::Dark => "Light theme",
            ThemePreset::Light => "Dark theme",
        };
        let controls = row![
            button(theme_label).on_press(Message::ToggleTheme).padding(8),
            button("Generate visits").on_press(Message::Generate).padding(8),
        ]
        .spacing(10);

        let map_column = column![
            text("My exploration map").size(26),
            map,
            controls,
            text(&state.status).size(14),
            state.selected_details(),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::FillPortion(3));

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let side_column = column![
            text("Summary").size(22),
            state.summary_view(),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(160.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::FillPortion(2));

        let layout = row![map_column, side_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn selected_details(&self) -> Element<'_, Message> {
        let Some(visit) = self.selection.selected().and_then(|id| self.feed.find(id)) else {
            return text("Tap a marker to see the visit").size(14).into();
        };
        let mut details = Column::new()
            .spacing(4)
            .push(text(visit.place_name.clone()).size(18));
        if !visit.category.is_empty() {
            details = details.push(text(visit.category.clone()).size(12));
        }
        if let Some(visited_at) = visit.visited_at {
            details = details.push(text(visited_at.format("%Y-%m-%d %H:%M").to_string()).size(12));
        }
        let mut stats = Vec::new();
        if let Some(xp) = visit.xp_earned {
            stats.push(format!("+{xp} XP"));
        }
        if let Some(minutes) = visit.duration_minutes {
            stats.push(format!("{minutes} min"));
        }
        if let Some(spent) = visit.spent_amount {
            stats.push(format!("spent {spent}"));
        }
        if let Some(rating) = visit.rating {
            stats.push(format!("rating {rating:.1}"));
        }
        if let Some(mood) = &visit.mood {
            stats.push(mood.clone());
        }
        if !stats.is_empty() {
            details = details.push(text(stats.join(" | ")).size(12));
        }
        Container::new(details).padding(6).into()
    }

    fn summary_view(&self) -> Element<'_, Message> {
        let summary = self.feed.summary();
        let header = text(format!(
            "{} visits | {} XP | {} min | spent {}",
            summary.total_visits,
            summary.total_xp,
            summary.total_duration_minutes,
            summary.total_spent
        ))
        .size(14);
        summary
            .categories
            .iter()
            .fold(Column::new().spacing(4).push(header), |col, share| {
                col.push(text(format!("{}: {} ({}%)", share.name, share.count, share.pct)).size(12))
            })
            .into()
    }

    /// Clears the cached geometry whenever anything the frame depends on
    /// changed.
    fn invalidate(&mut self) {
        let key = FrameKey::new(
            &self.feed.visits,
            self.selection.selected(),
            &self.theme,
            self.viewport,
        );
        if let Some(reason) = self.redraw.observe(key) {
            log::debug!("map redraw: {reason:?}");
            self.cache.clear();
        }
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_feed() -> Result<VisitFeed, String> {
    let response = reqwest::get(format!("{}/visits", feed_url()))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisitFeed>()
        .await
        .map(VisitFeed::normalized)
        .map_err(|e| e.to_string())
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    count: usize,
    seed: u64,
}

async fn post_generate(seed: u64) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/generate", feed_url()))
        .json(&GenerateRequest { count: 8, seed })
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(format!("Generated visits with seed {seed}"))
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}
