//! Render directives and plans.

use std::time::Duration;

use ashen_veil_core::transport::{Choice, TextStyle};

use super::actions::ActionToken;
use super::events::StoryEvent;

/// Notice shown when a button does not belong to the current scene.
pub const UNRECOGNIZED_NOTICE: &str = "🌀 The world rearranges its punctuation. Nothing else moves.";

/// Hosted media used by the scene scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaAsset {
    /// Looping rain.
    RainGif,
    /// Death certificate dated tomorrow.
    DeathCert,
    /// Newspaper obituary.
    Newspaper,
    /// Empty hallway.
    Hallway,
    /// Water dripping.
    DripAudio,
    /// Merrick's bar.
    Bar,
    /// Body bag on a gurney.
    Bodybag,
    /// Morgue interior.
    MorgueInterior,
    /// Toe tag close-up.
    ToeTag,
    /// Annotated flood rescue map.
    FloodMap,
    /// The Archivist.
    ArchivistPortrait,
    /// Flashlight sweep.
    FlashlightGif,
    /// Heartbeat.
    HeartbeatAudio,
    /// Telephone static.
    StaticAudio,
    /// Bonus ending clip.
    FinalClip,
}

impl MediaAsset {
    /// Catalogue key of the asset.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::RainGif => "rain_gif",
            Self::DeathCert => "death_cert",
            Self::Newspaper => "newspaper",
            Self::Hallway => "hallway",
            Self::DripAudio => "drip_audio",
            Self::Bar => "bar",
            Self::Bodybag => "bodybag",
            Self::MorgueInterior => "morgue_interior",
            Self::ToeTag => "toe_tag",
            Self::FloodMap => "flood_map",
            Self::ArchivistPortrait => "archivist_portrait",
            Self::FlashlightGif => "flashlight_gif",
            Self::HeartbeatAudio => "heartbeat_mp3",
            Self::StaticAudio => "static_audio",
            Self::FinalClip => "final_clip",
        }
    }

    /// Hosted URL of the asset.
    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Self::RainGif => "https://files.catbox.moe/5t0o3x.gif",
            Self::DeathCert => "https://files.catbox.moe/1wk2nq.jpg",
            Self::Newspaper => "https://files.catbox.moe/9h9n9r.jpg",
            Self::Hallway => "https://files.catbox.moe/d0g5qv.jpg",
            Self::DripAudio => "https://files.catbox.moe/b7o3pn.mp3",
            Self::Bar => "https://files.catbox.moe/6w2l6l.jpg",
            Self::Bodybag => "https://files.catbox.moe/3b7p2z.jpg",
            Self::MorgueInterior => "https://files.catbox.moe/abcd01.jpg",
            Self::ToeTag => "https://files.catbox.moe/toetag.jpg",
            Self::FloodMap => "https://files.catbox.moe/floodmap.jpg",
            Self::ArchivistPortrait => "https://files.catbox.moe/archivist.jpg",
            Self::FlashlightGif => "https://files.catbox.moe/flashlight.gif",
            Self::HeartbeatAudio => "https://files.catbox.moe/heartbeat.mp3",
            Self::StaticAudio => "https://files.catbox.moe/static.mp3",
            Self::FinalClip => "https://files.catbox.moe/finalvideo.mp4",
        }
    }
}

/// One step of a scene script.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDirective {
    /// Show the typing indicator, then wait.
    Typing(Duration),
    /// Wait without any indicator.
    Pause(Duration),
    /// Send a text message. `typed` messages are preceded by a typing
    /// indicator whose length scales with the text.
    Text {
        /// Message body.
        text: String,
        /// Formatting.
        style: TextStyle,
        /// Whether to show the typing indicator first.
        typed: bool,
    },
    /// Send an image.
    Photo {
        /// Asset to send.
        asset: MediaAsset,
        /// Optional caption.
        caption: Option<String>,
    },
    /// Send an audio clip; `fallback` is sent as text if the clip is refused.
    Audio {
        /// Asset to send.
        asset: MediaAsset,
        /// Optional caption.
        caption: Option<String>,
        /// Text sent instead when the clip cannot be delivered.
        fallback: String,
    },
    /// Send a video.
    Video {
        /// Asset to send.
        asset: MediaAsset,
        /// Optional caption.
        caption: Option<String>,
    },
    /// Show `frames` in one message, rewritten in place every `beat`.
    Animate {
        /// Frames in display order.
        frames: Vec<String>,
        /// Formatting of every frame.
        style: TextStyle,
        /// Delay between consecutive frames.
        beat: Duration,
    },
    /// Send a prompt with one button per choice.
    Prompt {
        /// Prompt text.
        text: String,
        /// Buttons, one per row.
        choices: Vec<Choice>,
    },
}

impl RenderDirective {
    /// Every piece of player-visible text carried by the directive.
    #[must_use]
    pub fn visible_text(&self) -> Vec<&str> {
        match self {
            Self::Typing(_) | Self::Pause(_) => Vec::new(),
            Self::Text { text, .. } => vec![text.as_str()],
            Self::Photo { caption, .. } | Self::Video { caption, .. } => {
                caption.iter().map(String::as_str).collect()
            }
            Self::Audio {
                caption, fallback, ..
            } => caption
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(fallback.as_str()))
                .collect(),
            Self::Animate { frames, .. } => frames.iter().map(String::as_str).collect(),
            Self::Prompt { text, choices } => std::iter::once(text.as_str())
                .chain(choices.iter().map(|choice| choice.label.as_str()))
                .collect(),
        }
    }
}

/// Builder for a fixed sequence of render directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    directives: Vec<RenderDirective>,
}

impl Script {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text preceded by a typing indicator.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(RenderDirective::Text {
            text: text.into(),
            style: TextStyle::Plain,
            typed: true,
        })
    }

    /// Markdown text preceded by a typing indicator.
    #[must_use]
    pub fn markdown(self, text: impl Into<String>) -> Self {
        self.push(RenderDirective::Text {
            text: text.into(),
            style: TextStyle::Markdown,
            typed: true,
        })
    }

    /// Markdown text sent immediately, without a typing indicator.
    #[must_use]
    pub fn blurt(self, text: impl Into<String>) -> Self {
        self.push(RenderDirective::Text {
            text: text.into(),
            style: TextStyle::Markdown,
            typed: false,
        })
    }

    /// Wait `millis` milliseconds.
    #[must_use]
    pub fn pause(self, millis: u64) -> Self {
        self.push(RenderDirective::Pause(Duration::from_millis(millis)))
    }

    /// Typing indicator for `millis` milliseconds.
    #[must_use]
    pub fn typing(self, millis: u64) -> Self {
        self.push(RenderDirective::Typing(Duration::from_millis(millis)))
    }

    /// Image with caption.
    #[must_use]
    pub fn photo(self, asset: MediaAsset, caption: impl Into<String>) -> Self {
        self.push(RenderDirective::Photo {
            asset,
            caption: Some(caption.into()),
        })
    }

    /// Audio with caption and text fallback.
    #[must_use]
    pub fn audio(
        self,
        asset: MediaAsset,
        caption: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.push(RenderDirective::Audio {
            asset,
            caption: Some(caption.into()),
            fallback: fallback.into(),
        })
    }

    /// Video with caption.
    #[must_use]
    pub fn video(self, asset: MediaAsset, caption: impl Into<String>) -> Self {
        self.push(RenderDirective::Video {
            asset,
            caption: Some(caption.into()),
        })
    }

    /// In-place animation.
    #[must_use]
    pub fn animate(self, frames: &[&str], style: TextStyle, beat_millis: u64) -> Self {
        self.push(RenderDirective::Animate {
            frames: frames.iter().map(|frame| (*frame).to_owned()).collect(),
            style,
            beat: Duration::from_millis(beat_millis),
        })
    }

    /// Button prompt; `choices` are `(label, token)` pairs.
    #[must_use]
    pub fn prompt(self, text: impl Into<String>, choices: &[(&str, ActionToken)]) -> Self {
        self.push(RenderDirective::Prompt {
            text: text.into(),
            choices: choices
                .iter()
                .map(|(label, token)| Choice::new(*label, token.as_str()))
                .collect(),
        })
    }

    /// Appends another script.
    #[must_use]
    pub fn then(mut self, other: Script) -> Self {
        self.directives.extend(other.directives);
        self
    }

    /// Appends a raw directive.
    #[must_use]
    pub fn push(mut self, directive: RenderDirective) -> Self {
        self.directives.push(directive);
        self
    }

    /// Consumes the builder.
    #[must_use]
    pub fn into_directives(self) -> Vec<RenderDirective> {
        self.directives
    }
}

/// How a dispatch was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new session was started.
    Started,
    /// The transition fired and its events were applied.
    Applied(ActionToken),
    /// The token was unknown or not valid for the current scene.
    Unrecognized,
}

/// Result of dispatching one action: what to render, and what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// How the dispatch was resolved.
    pub outcome: Outcome,
    /// Directives to execute, in order.
    pub directives: Vec<RenderDirective>,
    /// Events already applied to the session.
    pub events: Vec<StoryEvent>,
}

impl RenderPlan {
    /// A plan for a transition that fired.
    #[must_use]
    pub fn applied(token: ActionToken, events: Vec<StoryEvent>, script: Script) -> Self {
        Self {
            outcome: Outcome::Applied(token),
            directives: script.into_directives(),
            events,
        }
    }

    /// The plan for a freshly started session.
    #[must_use]
    pub fn started(script: Script) -> Self {
        Self {
            outcome: Outcome::Started,
            directives: script.into_directives(),
            events: Vec::new(),
        }
    }

    /// The single-notice plan for a rejected token.
    #[must_use]
    pub fn unrecognized() -> Self {
        Self {
            outcome: Outcome::Unrecognized,
            directives: Script::new().text(UNRECOGNIZED_NOTICE).into_directives(),
            events: Vec::new(),
        }
    }

    /// Whether any visible text contains `needle`.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.directives
            .iter()
            .flat_map(RenderDirective::visible_text)
            .any(|text| text.contains(needle))
    }

    /// Whether the plan sends a video.
    #[must_use]
    pub fn has_video(&self) -> bool {
        self.directives
            .iter()
            .any(|directive| matches!(directive, RenderDirective::Video { .. }))
    }

    /// Tokens offered by the plan's button prompts.
    #[must_use]
    pub fn offered_tokens(&self) -> Vec<&str> {
        self.directives
            .iter()
            .filter_map(|directive| match directive {
                RenderDirective::Prompt { choices, .. } => Some(choices),
                _ => None,
            })
            .flatten()
            .map(|choice| choice.token.as_str())
            .collect()
    }
}
