//! Daily run orchestration.

use std::time::{Duration, Instant};

use astroreel_content::{build_caption, ContentClient, ContentConfig};
use astroreel_media::{render, RenderOptions};
use astroreel_models::{REEL_HEIGHT, REEL_WIDTH};
use astroreel_publisher::{Publisher, PublishError, SessionStore, SocialClient};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::BotResult;

/// How often the daemon loop checks the clock.
const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Everything one run needs, constructed once at startup.
pub struct BotContext {
    pub settings: Settings,
    content: ContentClient,
    publisher: Publisher,
    render_opts: RenderOptions,
}

impl BotContext {
    pub fn from_settings(settings: Settings) -> BotResult<Self> {
        let content = ContentClient::new(ContentConfig {
            apod_url: settings.apod_api_url.clone(),
            news_url: settings.news_api_url.clone(),
            api_key: settings.api_key.clone(),
            cache_ttl: settings.cache_ttl,
            retry: settings.retry_policy("content_fetch"),
        })?;

        let publisher = Publisher::new(
            SocialClient::new(settings.social_api_url.clone())?,
            SessionStore::new(&settings.session_file),
            settings.username.clone(),
            settings.password.clone(),
        )
        .with_max_upload_bytes(settings.max_upload_bytes)
        .with_retry_policy(settings.retry_policy("reel_upload"));

        let render_opts = RenderOptions {
            width: REEL_WIDTH,
            height: REEL_HEIGHT,
            fps: settings.fps,
            duration_secs: settings.duration_secs,
            use_branding_background: settings.use_branding,
            branding_path: settings.branding_image_path.clone(),
            work_dir: settings.work_dir.clone(),
            max_output_bytes: settings.max_upload_bytes,
            ..RenderOptions::default()
        };

        Ok(Self {
            settings,
            content,
            publisher,
            render_opts,
        })
    }
}

/// Execute one full fetch-render-publish run.
///
/// Returns whether the reel was published. The rendered file is
/// removed on every exit path; a failed run never stops a future one.
pub async fn run_once(ctx: &mut BotContext) -> bool {
    let started = Instant::now();

    let item = ctx.content.daily_item().await;
    info!(
        title = %item.title,
        origin = item.origin.as_str(),
        "Fetched daily content"
    );
    let caption = build_caption(&item, &ctx.settings.hashtags);

    ensure_branding_image(ctx).await;

    let reel = match render(&item, &ctx.render_opts).await {
        Ok(reel) => reel,
        Err(e) => {
            error!("Render failed: {e}");
            return false;
        }
    };
    info!(
        path = %reel.path.display(),
        size_mb = format!("{:.2}", reel.size_mb()),
        "Rendered reel"
    );

    let outcome = ctx.publisher.post(&reel.path, &caption).await;

    if let Err(e) = tokio::fs::remove_file(&reel.path).await {
        warn!("Failed to remove reel file: {e}");
    }

    match outcome {
        Ok(media_id) => {
            info!(
                media_id = %media_id,
                elapsed_secs = started.elapsed().as_secs(),
                "Published daily reel"
            );
            true
        }
        Err(PublishError::ChallengeRequired(msg)) => {
            error!(
                "Login challenge: {msg}. Complete the verification in the \
                 official app, then restart the bot."
            );
            false
        }
        Err(e) => {
            error!(
                elapsed_secs = started.elapsed().as_secs(),
                "Publish failed: {e}"
            );
            false
        }
    }
}

/// Whether a run should fire: the scheduled time has passed and no run
/// has happened today.
pub fn should_post(
    now: NaiveDateTime,
    posting_time: NaiveTime,
    last_posted: Option<NaiveDate>,
) -> bool {
    now.time() >= posting_time && last_posted != Some(now.date())
}

/// Daemon loop: poll the clock and fire at most one run per calendar
/// day. The day is marked consumed whether the run succeeds or not, so
/// a persistent failure cannot hammer the services all day.
pub async fn run_forever(ctx: &mut BotContext) {
    info!(
        posting_time = %ctx.settings.posting_time,
        "Scheduler started"
    );
    let mut last_posted: Option<NaiveDate> = None;

    loop {
        let now = Local::now().naive_local();
        if should_post(now, ctx.settings.posting_time, last_posted) {
            last_posted = Some(now.date());
            if !run_once(ctx).await {
                warn!("Daily run failed, next attempt tomorrow");
            }
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }
}

/// Make sure the branding image exists, preferring the account's
/// profile picture and falling back to a solid placeholder. A missing
/// file is not fatal; the frame composer degrades without it.
async fn ensure_branding_image(ctx: &mut BotContext) {
    let path = ctx.settings.branding_image_path.clone();
    if path.exists() {
        return;
    }

    match ctx.publisher.fetch_profile_picture(&path).await {
        Ok(()) => return,
        Err(e) => warn!("Could not fetch profile picture: {e}"),
    }

    let placeholder = image::RgbImage::from_pixel(400, 400, image::Rgb([18, 22, 52]));
    if let Err(e) = placeholder.save(&path) {
        warn!("Could not write placeholder branding image: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M")
            .unwrap()
    }

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn test_does_not_fire_before_posting_time() {
        assert!(!should_post(at("2026-08-23", "08:59"), nine(), None));
    }

    #[test]
    fn test_fires_once_past_posting_time() {
        assert!(should_post(at("2026-08-23", "09:00"), nine(), None));
        assert!(should_post(at("2026-08-23", "15:30"), nine(), None));
    }

    #[test]
    fn test_does_not_fire_twice_same_day() {
        let today = at("2026-08-23", "10:00");
        assert!(!should_post(today, nine(), Some(today.date())));
    }

    #[test]
    fn test_fires_again_next_day() {
        let yesterday = at("2026-08-22", "10:00").date();
        assert!(should_post(at("2026-08-23", "09:01"), nine(), Some(yesterday)));
    }

    #[test]
    fn test_repeated_polls_fire_exactly_once_per_day() {
        let mut last_posted: Option<NaiveDate> = None;
        let mut fired = 0;

        for day in ["2026-08-23", "2026-08-24"] {
            for minute in 0..(24 * 60) {
                let now = at(day, "00:00") + chrono::Duration::minutes(minute);
                if should_post(now, nine(), last_posted) {
                    last_posted = Some(now.date());
                    fired += 1;
                }
            }
        }
        assert_eq!(fired, 2);
    }
}
