//! External collaborators the orchestrator consumes.
//!
//! Only the interface boundary lives here, plus the URL builders for the
//! content panels.

use serde::Deserialize;

use super::types::{DisplayInfo, Theme};
use crate::error::OverlayResult;

/// Whether a user session is currently logged in.
pub trait AuthProvider: Send + Sync {
    fn is_logged_in(&self) -> bool;
}

/// Chat URL for the currently active streaming platform.
pub trait ChatUrlResolver: Send + Sync {
    fn chat_url(&self, theme: Theme) -> OverlayResult<String>;
}

/// URL of the user's recent-events feed.
pub trait RecentEventsSource: Send + Sync {
    fn recent_events_url(&self, theme: Theme) -> OverlayResult<String>;
}

/// Display the overlay windows are laid out on.
pub trait DisplayProvider: Send + Sync {
    fn current_display(&self) -> DisplayInfo;
}

/// Current UI theme.
pub trait ThemeSource: Send + Sync {
    fn theme(&self) -> Theme;
}

// ============================================================================
// Platform Chat
// ============================================================================

/// Streaming platform whose chat is shown, with the channel it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum StreamingPlatform {
    Twitch {
        channel: String,
    },
    #[serde(rename_all = "camelCase")]
    YouTube {
        video_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Facebook {
        page_id: String,
        video_id: String,
    },
}

impl ChatUrlResolver for StreamingPlatform {
    fn chat_url(&self, theme: Theme) -> OverlayResult<String> {
        let night = theme == Theme::Night;
        let url = match self {
            StreamingPlatform::Twitch { channel } => {
                let mut url = format!(
                    "https://www.twitch.tv/popout/{}/chat",
                    urlencoding::encode(channel)
                );
                if night {
                    url.push_str("?darkpopout");
                }
                url
            },
            StreamingPlatform::YouTube { video_id } => {
                let mut url = format!(
                    "https://www.youtube.com/live_chat?v={}&is_popout=1",
                    urlencoding::encode(video_id)
                );
                if night {
                    url.push_str("&dark_theme=1");
                }
                url
            },
            StreamingPlatform::Facebook { page_id, video_id } => format!(
                "https://www.facebook.com/gaming/streamer/{}/live_chat?video_id={}",
                urlencoding::encode(page_id),
                urlencoding::encode(video_id)
            ),
        };
        Ok(url)
    }
}

// ============================================================================
// Recent Events
// ============================================================================

/// Recent-events dashboard link for a widget token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEventsLink {
    pub base_url: String,
    pub token: String,
}

impl RecentEventsSource for RecentEventsLink {
    fn recent_events_url(&self, theme: Theme) -> OverlayResult<String> {
        Ok(format!(
            "{}/dashboard/recent-events?token={}&mode={}&electron",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.token),
            theme.as_str()
        ))
    }
}
