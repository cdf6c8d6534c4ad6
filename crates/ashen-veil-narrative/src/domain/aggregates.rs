//! Aggregate root for a story session.

use std::collections::{BTreeMap, BTreeSet};

use ashen_veil_core::clock::Clock;
use ashen_veil_core::ids::{ChatId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::actions::ActionToken;
use super::acts::Act;
use super::events::StoryEvent;
use super::flags::{Flag, FlagValue};
use super::render::RenderPlan;
use super::scenes::Scene;
use super::scripts;
use super::story;

/// Per-chat story state.
///
/// Mutated only through [`Session::dispatch`], which resolves the transition
/// and applies the resulting events before returning the plan to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) chat_id: ChatId,
    pub(crate) owner_id: UserId,
    pub(crate) act: Act,
    /// Scene whose prompt the session is waiting on. Snapshots written
    /// before the field existed load as the opening.
    #[serde(default)]
    pub(crate) scene: Scene,
    /// Reserved; no transition collects items yet.
    #[serde(default)]
    pub(crate) inventory: BTreeSet<String>,
    #[serde(default)]
    pub(crate) evidence: Vec<String>,
    #[serde(default)]
    pub(crate) flags: BTreeMap<String, FlagValue>,
    /// Reserved; nothing pins messages yet.
    #[serde(default)]
    pub(crate) pinned_msg_id: Option<MessageId>,
    #[serde(default)]
    pub(crate) started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session at the opening with no recorded choices.
    #[must_use]
    pub fn new(chat_id: ChatId, owner_id: UserId, started_at: Option<DateTime<Utc>>) -> Self {
        Self {
            chat_id,
            owner_id,
            act: Act::Act1,
            scene: Scene::Opening,
            inventory: BTreeSet::new(),
            evidence: Vec::new(),
            flags: BTreeMap::new(),
            pinned_msg_id: None,
            started_at,
        }
    }

    /// Starts a fresh playthrough and returns it with the opening plan.
    #[must_use]
    pub fn begin(chat_id: ChatId, owner_id: UserId, clock: &dyn Clock) -> (Self, RenderPlan) {
        let session = Self::new(chat_id, owner_id, Some(clock.now()));
        (session, RenderPlan::started(scripts::opening()))
    }

    /// Resolves a button token against the current scene.
    ///
    /// Unknown tokens and tokens that do not belong to the current scene
    /// leave the session untouched and yield the single fallback notice.
    pub fn dispatch(&mut self, raw_token: &str) -> RenderPlan {
        let Ok(token) = raw_token.parse::<ActionToken>() else {
            debug!(chat_id = %self.chat_id, token = raw_token, "Unknown action token");
            return RenderPlan::unrecognized();
        };
        let Some(transition) = story::transition_for(token).filter(|t| t.accepts(self.scene))
        else {
            debug!(
                chat_id = %self.chat_id,
                token = raw_token,
                scene = %self.scene,
                "Action token not valid for scene"
            );
            return RenderPlan::unrecognized();
        };

        let step = transition.resolve(self);
        for event in &step.events {
            self.apply(event);
        }
        debug!(
            chat_id = %self.chat_id,
            token = raw_token,
            act = %self.act,
            scene = %self.scene,
            events = step.events.len(),
            "Transition applied"
        );
        RenderPlan::applied(token, step.events, step.script)
    }

    /// Applies a single event. Acts only move forward.
    pub fn apply(&mut self, event: &StoryEvent) {
        match event {
            StoryEvent::FlagRecorded { key, value } => {
                self.flags.insert(key.clone(), value.clone());
            }
            StoryEvent::EvidenceCollected { item } => self.evidence.push(item.clone()),
            StoryEvent::ActAdvanced { act } => self.act = self.act.max(*act),
            StoryEvent::SceneEntered { scene } => self.scene = *scene,
        }
    }

    /// Whether `flag` holds a truthy value.
    #[must_use]
    pub fn is_flag_set(&self, flag: Flag) -> bool {
        self.flag(flag).is_some_and(FlagValue::is_truthy)
    }

    /// Value recorded under `flag`, if any.
    #[must_use]
    pub fn flag(&self, flag: Flag) -> Option<&FlagValue> {
        self.flags.get(flag.key())
    }

    /// Chat owning the session.
    #[must_use]
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// User who issued the start command.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Current act.
    #[must_use]
    pub fn act(&self) -> Act {
        self.act
    }

    /// Scene whose prompt is awaited.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene
    }

    /// Collected items.
    #[must_use]
    pub fn inventory(&self) -> &BTreeSet<String> {
        &self.inventory
    }

    /// Collected evidence in collection order.
    #[must_use]
    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    /// Every recorded flag, including keys this build does not know.
    #[must_use]
    pub fn flags(&self) -> &BTreeMap<String, FlagValue> {
        &self.flags
    }

    /// Pinned message, if any.
    #[must_use]
    pub fn pinned_msg_id(&self) -> Option<MessageId> {
        self.pinned_msg_id
    }

    /// When the playthrough began.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::render::{Outcome, RenderDirective};
    use ashen_veil_test_support::FixedClock;
    use chrono::TimeZone;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    fn started() -> Session {
        Session::begin(ChatId(42), UserId(7), &fixed_clock()).0
    }

    fn play(session: &mut Session, tokens: &[&str]) -> Vec<RenderPlan> {
        tokens.iter().map(|token| session.dispatch(token)).collect()
    }

    const MORGUE_SAVE: &[&str] = &[
        "a1_pkg",
        "a2_arch",
        "a3_merrick",
        "goto_morgue",
        "morg_revive",
        "a4_break",
        "end_save",
    ];

    #[test]
    fn test_begin_opens_at_act1_with_empty_state() {
        // Arrange
        let clock = fixed_clock();

        // Act
        let (session, plan) = Session::begin(ChatId(42), UserId(7), &clock);

        // Assert
        assert_eq!(session.act(), Act::Act1);
        assert_eq!(session.scene(), Scene::Opening);
        assert!(session.flags().is_empty());
        assert!(session.evidence().is_empty());
        assert!(session.inventory().is_empty());
        assert_eq!(session.started_at(), Some(clock.0));
        assert_eq!(plan.outcome, Outcome::Started);
        assert_eq!(plan.offered_tokens(), vec!["a1_pkg", "a1_hall", "a1_docks"]);
    }

    #[test]
    fn test_begin_discards_everything_from_a_previous_playthrough() {
        // Arrange
        let mut old = started();
        play(&mut old, MORGUE_SAVE);
        assert_eq!(old.act(), Act::End);

        // Act
        let (fresh, _) = Session::begin(old.chat_id(), old.owner_id(), &fixed_clock());

        // Assert
        assert_eq!(fresh.act(), Act::Act1);
        assert!(fresh.flags().is_empty());
        assert!(fresh.evidence().is_empty());
        assert!(fresh.inventory().is_empty());
    }

    #[test]
    fn test_valid_path_never_lowers_the_act_and_ends_on_an_ending_token() {
        let paths: &[&[&str]] = &[
            MORGUE_SAVE,
            &[
                "a1_hall",
                "a2_home",
                "a3_archivist",
                "goto_flood",
                "flood_archive",
                "arch_press",
                "arch_record",
                "a4_hunt",
                "end_veil",
            ],
            &[
                "a1_docks",
                "a2_forest",
                "a3_call",
                "arch_press",
                "arch_leave",
                "a4_burn",
                "end_burn",
            ],
            &[
                "a1_pkg",
                "a2_home",
                "a3_merrick",
                "goto_morgue",
                "morg_photo",
                "goto_flood",
                "flood_leak",
                "a4_break",
                "end_save",
            ],
        ];

        for path in paths {
            let mut session = started();
            let mut previous = session.act();

            for (index, token) in path.iter().enumerate() {
                let plan = session.dispatch(token);

                assert!(
                    matches!(plan.outcome, Outcome::Applied(_)),
                    "{token} rejected in {path:?}"
                );
                assert!(session.act() >= previous, "{token} lowered the act");
                let is_last = index + 1 == path.len();
                assert_eq!(session.act() == Act::End, is_last, "{token} in {path:?}");
                previous = session.act();
            }
        }
    }

    #[test]
    fn test_token_from_another_scene_changes_nothing() {
        // Arrange
        let mut session = started();
        play(&mut session, &["a1_pkg", "a2_arch"]);
        let before = session.clone();

        // Act
        let plan = session.dispatch("end_save");

        // Assert
        assert_eq!(session, before);
        assert_eq!(plan.outcome, Outcome::Unrecognized);
        assert_eq!(plan.directives.len(), 1);
        assert!(plan.contains_text("rearranges its punctuation"));
    }

    #[test]
    fn test_unknown_token_changes_nothing() {
        let mut session = started();
        let before = session.clone();

        let plan = session.dispatch("a9_nonsense");

        assert_eq!(session, before);
        assert_eq!(plan.outcome, Outcome::Unrecognized);
    }

    #[test]
    fn test_stale_button_after_moving_on_is_rejected() {
        let mut session = started();
        play(&mut session, &["a1_pkg"]);
        let before = session.clone();

        let plan = session.dispatch("a1_hall");

        assert_eq!(plan.outcome, Outcome::Unrecognized);
        assert_eq!(session, before);
    }

    #[test]
    fn test_save_ending_with_revived_lila_shows_mercy_and_video() {
        // Arrange
        let mut session = started();
        play(&mut session, &MORGUE_SAVE[..MORGUE_SAVE.len() - 1]);
        assert!(session.is_flag_set(Flag::RevivedLila));

        // Act
        let plan = session.dispatch("end_save");

        // Assert
        assert!(plan.contains_text("mercy"));
        assert!(plan.has_video());
        assert_eq!(session.flag(Flag::Ending), Some(&FlagValue::from("save")));
    }

    #[test]
    fn test_save_ending_without_flags_reaches_into_smoke() {
        // Arrange
        let mut session = started();
        session.act = Act::Act5;
        session.scene = Scene::Finale;

        // Act
        let plan = session.dispatch("end_save");

        // Assert
        assert!(plan.contains_text("reaching into smoke"));
        assert!(!plan.has_video());
    }

    #[test]
    fn test_save_ending_with_hidden_lila_sends_hallway_photo() {
        let mut session = started();
        session.scene = Scene::Finale;
        session.apply(&StoryEvent::FlagRecorded {
            key: Flag::LilaHidden.key().to_owned(),
            value: FlagValue::Bool(true),
        });

        let plan = session.dispatch("end_save");

        assert!(!plan.has_video());
        assert!(plan.directives.iter().any(|directive| matches!(
            directive,
            RenderDirective::Photo {
                asset: crate::domain::render::MediaAsset::Hallway,
                ..
            }
        )));
    }

    #[test]
    fn test_evidence_keeps_collection_order() {
        // Arrange
        let mut session = started();

        // Act
        play(
            &mut session,
            &[
                "a1_pkg",
                "a2_arch",
                "a3_merrick",
                "goto_morgue",
                "morg_photo",
                "goto_flood",
                "flood_archive",
            ],
        );

        // Assert
        assert_eq!(
            session.evidence(),
            ["file_evelyn", "toe_tag_photo", "flood_maps"]
        );
    }

    #[test]
    fn test_act_advance_never_moves_backwards() {
        let mut session = started();
        session.apply(&StoryEvent::ActAdvanced { act: Act::Act4 });

        session.apply(&StoryEvent::ActAdvanced { act: Act::Act2 });

        assert_eq!(session.act(), Act::Act4);
    }

    #[test]
    fn test_ending_token_refired_after_end_is_rejected_without_panic() {
        let mut session = started();
        play(&mut session, MORGUE_SAVE);
        let before = session.clone();

        let plan = session.dispatch("end_save");

        assert_eq!(plan.outcome, Outcome::Unrecognized);
        assert_eq!(session, before);
    }

    #[test]
    fn test_snapshot_without_scene_field_loads_at_opening() {
        let json = r#"{"chat_id":5,"owner_id":6,"act":"act3","evidence":["file_evelyn"],"flags":{"met_merrick":true}}"#;

        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.act(), Act::Act3);
        assert_eq!(session.scene(), Scene::Opening);
        assert!(session.is_flag_set(Flag::MetMerrick));
        assert_eq!(session.pinned_msg_id(), None);
    }
}
