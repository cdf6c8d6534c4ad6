//! The transition table.
//!
//! Every action token has exactly one [`Transition`]: the scenes it may fire
//! from and a resolver that reads the session and returns the events to
//! record plus the script to render. Narration that depends on earlier
//! choices is looked up in small decision tables ([`NarrationVariant`])
//! rather than written as inline conditionals.

use ashen_veil_core::transport::TextStyle;

use super::actions::ActionToken;
use super::acts::Act;
use super::aggregates::Session;
use super::events::StoryEvent;
use super::flags::{Flag, FlagValue};
use super::render::{MediaAsset, Script};
use super::scenes::Scene;
use super::scripts;

/// Events and script produced by a resolver.
#[derive(Debug, Default)]
pub struct Step {
    /// Events to apply, in order.
    pub events: Vec<StoryEvent>,
    /// Script to render.
    pub script: Script,
}

impl Step {
    fn new() -> Self {
        Self::default()
    }

    fn flag(mut self, flag: Flag) -> Self {
        self.events.push(StoryEvent::FlagRecorded {
            key: flag.key().to_owned(),
            value: FlagValue::Bool(true),
        });
        self
    }

    fn choice(mut self, flag: Flag, value: &str) -> Self {
        self.events.push(StoryEvent::FlagRecorded {
            key: flag.key().to_owned(),
            value: FlagValue::from(value),
        });
        self
    }

    fn evidence(mut self, item: &str) -> Self {
        self.events.push(StoryEvent::EvidenceCollected {
            item: item.to_owned(),
        });
        self
    }

    fn act(mut self, act: Act) -> Self {
        self.events.push(StoryEvent::ActAdvanced { act });
        self
    }

    fn render(mut self, script: Script, next: Scene) -> Self {
        self.script = self.script.then(script);
        self.events.push(StoryEvent::SceneEntered { scene: next });
        self
    }
}

/// One row of the transition table.
#[derive(Debug)]
pub struct Transition {
    /// Token that fires the transition.
    pub token: ActionToken,
    /// Scenes the token is valid from.
    pub from: &'static [Scene],
    resolve: fn(&Session) -> Step,
}

impl Transition {
    /// Whether the transition may fire while the session waits on `scene`.
    #[must_use]
    pub fn accepts(&self, scene: Scene) -> bool {
        self.from.contains(&scene)
    }

    /// Computes the events and script for `session`. Does not mutate.
    #[must_use]
    pub fn resolve(&self, session: &Session) -> Step {
        (self.resolve)(session)
    }
}

/// Condition selecting a narration variant.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// The flag is set to a truthy value.
    FlagSet(Flag),
    /// Always matches; used as the last row.
    Otherwise,
}

impl Condition {
    fn holds(self, session: &Session) -> bool {
        match self {
            Self::FlagSet(flag) => session.is_flag_set(flag),
            Self::Otherwise => true,
        }
    }
}

/// Extra media rendered by a narration variant.
#[derive(Debug, Clone, Copy)]
pub enum Bonus {
    /// Image with caption.
    Photo(MediaAsset, &'static str),
    /// Audio with caption and text fallback.
    Audio(MediaAsset, &'static str, &'static str),
    /// Video with caption.
    Video(MediaAsset, &'static str),
}

/// One row of a decision table: condition, narration and bonus directives.
#[derive(Debug)]
pub struct NarrationVariant {
    /// Name used in logs and tests.
    pub name: &'static str,
    /// When the row applies.
    pub when: Condition,
    /// Narration lines, one message each.
    pub narration: &'static [&'static str],
    /// Media rendered after the narration.
    pub bonus: &'static [Bonus],
}

impl NarrationVariant {
    fn script(&self) -> Script {
        let script = self
            .narration
            .iter()
            .fold(Script::new(), |script, line| script.text(*line).pause(700));
        self.bonus
            .iter()
            .fold(script, |script, bonus| match *bonus {
                Bonus::Photo(asset, caption) => script.photo(asset, caption),
                Bonus::Audio(asset, caption, fallback) => script.audio(asset, caption, fallback),
                Bonus::Video(asset, caption) => script.video(asset, caption),
            })
    }
}

/// Returns the first row of `table` whose condition holds for `session`.
#[must_use]
pub fn select(
    table: &'static [NarrationVariant],
    session: &Session,
) -> Option<&'static NarrationVariant> {
    table.iter().find(|variant| variant.when.holds(session))
}

fn narrate(table: &'static [NarrationVariant], session: &Session) -> Script {
    select(table, session).map_or_else(Script::new, NarrationVariant::script)
}

/// Act 4 "break the cycle".
pub static BREAK_ROUTE: &[NarrationVariant] = &[
    NarrationVariant {
        name: "witnessed",
        when: Condition::FlagSet(Flag::LeakedDocuments),
        narration: &[
            "The town already knows. Every lamppost still wears the routes you leaked, and a loop with witnesses is harder to close.",
        ],
        bonus: &[],
    },
    NarrationVariant {
        name: "rewind",
        when: Condition::Otherwise,
        narration: &[
            "You wind the cassette back to the start. Somewhere in Crestfall, a clock decides to disagree with you.",
        ],
        bonus: &[],
    },
];

/// Act 4 "hunt your other self".
pub static HUNT_ROUTE: &[NarrationVariant] = &[
    NarrationVariant {
        name: "raincoat",
        when: Condition::FlagSet(Flag::MerrickPhoto),
        narration: &[
            "You follow the figure from Merrick's scorched photo through the rain. When it finally turns around, it is wearing your face.",
        ],
        bonus: &[],
    },
    NarrationVariant {
        name: "footsteps",
        when: Condition::Otherwise,
        narration: &[
            "You follow footsteps that match yours exactly, down to a limp you don't have yet.",
        ],
        bonus: &[],
    },
];

/// Ending "save the girl".
pub static SAVE_ENDING: &[NarrationVariant] = &[
    NarrationVariant {
        name: "mercy",
        when: Condition::FlagSet(Flag::RevivedLila),
        narration: &[
            "Lila takes your hand in the smoke. It is the first mercy Crestfall has ever allowed.",
            "For the first time in fourteen years, tomorrow is only tomorrow.",
        ],
        bonus: &[Bonus::Video(
            MediaAsset::FinalClip,
            "🎞 What the rain was hiding all along.",
        )],
    },
    NarrationVariant {
        name: "hidden",
        when: Condition::FlagSet(Flag::LilaHidden),
        narration: &[
            "You pry open the drawer you sealed. It holds nothing but a small yellow raincoat, still dry.",
            "Somewhere past the town line, a girl is walking away from Crestfall. She never looks back.",
        ],
        bonus: &[Bonus::Photo(
            MediaAsset::Hallway,
            "The hallway is empty. The door at the end is open.",
        )],
    },
    NarrationVariant {
        name: "smoke",
        when: Condition::Otherwise,
        narration: &[
            "You are reaching into smoke. Your hands close on nothing but heat.",
            "The death certificate in your pocket finishes signing itself.",
        ],
        bonus: &[],
    },
];

/// Ending "break the veil".
pub static VEIL_ENDING: &[NarrationVariant] = &[
    NarrationVariant {
        name: "tape",
        when: Condition::FlagSet(Flag::RecordedArchivist),
        narration: &[
            "The tape plays back, but the confession is in your voice, not theirs.",
            "The veil tears along the exact line of the lie. Behind it, the town is smaller than you remember.",
        ],
        bonus: &[Bonus::Audio(
            MediaAsset::StaticAudio,
            "The last seconds of the recording.",
            "_The recording dissolves into static._",
        )],
    },
    NarrationVariant {
        name: "tear",
        when: Condition::Otherwise,
        narration: &[
            "You tear the veil like wet paper. Crestfall is behind it, and behind Crestfall, another veil.",
        ],
        bonus: &[],
    },
];

/// Ending "let it burn".
pub static BURN_ENDING: &[NarrationVariant] = &[
    NarrationVariant {
        name: "ash",
        when: Condition::FlagSet(Flag::BurnedMaps),
        narration: &[
            "The ash from the maps drifts down to meet the ash from the house. Nobody will ever know which routes were diverted.",
            "You kept the secret. The secret keeps you.",
        ],
        bonus: &[],
    },
    NarrationVariant {
        name: "fire",
        when: Condition::Otherwise,
        narration: &[
            "You let it burn. The fire is patient, and it has waited fourteen years for you to say yes.",
        ],
        bonus: &[],
    },
];

/// Returns the transition for `token`. Every token has one.
#[must_use]
pub fn transition_for(token: ActionToken) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|transition| transition.token == token)
}

/// The full story graph.
pub static TRANSITIONS: &[Transition] = &[
    // Act 1
    Transition {
        token: ActionToken::A1Pkg,
        from: &[Scene::Opening],
        resolve: |_| {
            Step::new()
                .flag(Flag::HeardCassette)
                .act(Act::Act2)
                .render(
                    Script::new()
                        .pause(300)
                        .text("The cassette crackles: 'Find the girl. Don’t trust anyone. Not even me.'")
                        .pause(400)
                        .then(scripts::fracture()),
                    Scene::Fracture,
                )
        },
    },
    Transition {
        token: ActionToken::A1Hall,
        from: &[Scene::Opening],
        resolve: |_| {
            Step::new()
                .flag(Flag::MetArchivist)
                .act(Act::Act2)
                .render(
                    Script::new()
                        .text("The Archivist’s eyes are clouded. 'People who come back don’t leave the same way.'")
                        .pause(400)
                        .then(scripts::fracture()),
                    Scene::Fracture,
                )
        },
    },
    Transition {
        token: ActionToken::A1Docks,
        from: &[Scene::Opening],
        resolve: |_| {
            Step::new()
                .flag(Flag::MetMerrick)
                .act(Act::Act2)
                .render(
                    Script::new()
                        .text("Merrick smells of gasoline and old rain. 'You were lucky once,' he says.")
                        .pause(400)
                        .then(scripts::fracture()),
                    Scene::Fracture,
                )
        },
    },
    // Act 2
    Transition {
        token: ActionToken::A2Home,
        from: &[Scene::Fracture],
        resolve: |_| {
            Step::new()
                .evidence("locked_room")
                .act(Act::Act3)
                .render(
                    Script::new()
                        .text("Your old bedroom is locked from the inside. The handle is warm.")
                        .pause(600)
                        .then(scripts::investigate()),
                    Scene::Investigate,
                )
        },
    },
    Transition {
        token: ActionToken::A2Arch,
        from: &[Scene::Fracture],
        resolve: |_| {
            Step::new()
                .evidence("file_evelyn")
                .act(Act::Act3)
                .render(
                    Script::new()
                        .text("FILE #03 — Evelyn Marks, Missing. Note in margin: NOT AN ACCIDENT. SAME AS 1992.")
                        .pause(600)
                        .then(scripts::investigate()),
                    Scene::Investigate,
                )
        },
    },
    Transition {
        token: ActionToken::A2Forest,
        from: &[Scene::Fracture],
        resolve: |_| {
            Step::new()
                .evidence("forest_disturbance")
                .act(Act::Act3)
                .render(
                    Script::new()
                        .text("The ground is soft. Something stirs beneath it.")
                        .pause(600)
                        .then(scripts::investigate()),
                    Scene::Investigate,
                )
        },
    },
    // Act 3
    Transition {
        token: ActionToken::A3Merrick,
        from: &[Scene::Investigate],
        resolve: |_| {
            Step::new().flag(Flag::MerrickPhoto).render(
                Script::new()
                    .photo(
                        MediaAsset::Bar,
                        "Merrick: 'You don’t remember the fire, do you?'\nHe slides a half-burnt photo across the table.",
                    )
                    .pause(800)
                    .text("In the scorched photo, a small figure in a yellow raincoat stands beside you.")
                    .prompt(
                        "Do you:",
                        &[
                            ("→ Go to the morgue (investigate)", ActionToken::GotoMorgue),
                            ("→ Check archives", ActionToken::A3Archivist),
                        ],
                    ),
                Scene::MerrickLead,
            )
        },
    },
    Transition {
        token: ActionToken::A3Archivist,
        from: &[Scene::Investigate, Scene::MerrickLead],
        resolve: |_| {
            Step::new().flag(Flag::ArchiveTomorrow).render(
                Script::new()
                    .text("Archivist: 'Some pages rearrange themselves when you aren’t looking.'")
                    .pause(600)
                    .prompt(
                        "The Archivist rests a hand on a ledger with your name on the spine.",
                        &[
                            ("⚖️ Press them for answers", ActionToken::ArchPress),
                            ("🌊 Ask about the flood records", ActionToken::GotoFlood),
                        ],
                    ),
                Scene::ArchiveLead,
            )
        },
    },
    Transition {
        token: ActionToken::A3Call,
        from: &[Scene::Investigate],
        resolve: |_| {
            Step::new().flag(Flag::CalledNumber).render(
                Script::new()
                    .audio(
                        MediaAsset::StaticAudio,
                        "The line hisses. Someone is breathing on the other end.",
                        "_Static. Then breathing._",
                    )
                    .animate(
                        &[
                            "📞 Ringing…",
                            "📞 Ringing… ringing…",
                            "📞 *Click.* 'You already called me. Fourteen years ago.'",
                        ],
                        TextStyle::Markdown,
                        1200,
                    )
                    .pause(600)
                    .prompt(
                        "The line goes dead. There is a water stain on your palm shaped like a river.",
                        &[
                            ("🌊 Follow the water to the flood office", ActionToken::GotoFlood),
                            ("⚖️ Press them for answers", ActionToken::ArchPress),
                        ],
                    ),
                Scene::CallLead,
            )
        },
    },
    // Arc entries
    Transition {
        token: ActionToken::GotoMorgue,
        from: &[Scene::MerrickLead],
        resolve: |_| Step::new().render(scripts::morgue(), Scene::Morgue),
    },
    Transition {
        token: ActionToken::GotoFlood,
        from: &[Scene::ArchiveLead, Scene::CallLead, Scene::MorguePhoto],
        resolve: |_| Step::new().render(scripts::flood(), Scene::Flood),
    },
    Transition {
        token: ActionToken::ArchPress,
        from: &[
            Scene::ArchiveLead,
            Scene::CallLead,
            Scene::MorguePhoto,
            Scene::FloodArchived,
        ],
        resolve: |_| Step::new().render(scripts::archivist_betrayal(), Scene::Archivist),
    },
    // Morgue arc
    Transition {
        token: ActionToken::MorgRevive,
        from: &[Scene::Morgue],
        resolve: |_| {
            Step::new()
                .flag(Flag::RevivedLila)
                .act(Act::Act4)
                .render(
                    Script::new()
                        .animate(
                            &["💓 .  .  .  .  .  .", "💓 .  .  ♥  .  .  .", "💓 ♥  .  ♥  .  ♥  ."],
                            TextStyle::Plain,
                            1000,
                        )
                        .text("Lila coughs rainwater onto the steel tray. She is alive, and she looks at you like she remembers.")
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    Transition {
        token: ActionToken::MorgCall,
        from: &[Scene::Morgue],
        resolve: |_| {
            Step::new()
                .flag(Flag::LilaHidden)
                .evidence("morgue_call_log")
                .act(Act::Act4)
                .render(
                    Script::new()
                        .text("Footsteps answer your call, too fast and too many. You slide Lila's drawer shut and wedge a cabinet against it.")
                        .photo(
                            MediaAsset::Bodybag,
                            "They leave with the call log and an empty bag.",
                        )
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    Transition {
        token: ActionToken::MorgPhoto,
        from: &[Scene::Morgue],
        resolve: |_| {
            Step::new().evidence("toe_tag_photo").render(
                Script::new()
                    .photo(
                        MediaAsset::ToeTag,
                        "The shutter clicks. In the photograph, the name on the tag is different.",
                    )
                    .pause(600)
                    .prompt(
                        "Who sees this first?",
                        &[
                            ("⚖️ Press them for answers", ActionToken::ArchPress),
                            ("🌊 Compare it with the flood maps", ActionToken::GotoFlood),
                        ],
                    ),
                Scene::MorguePhoto,
            )
        },
    },
    // Flood arc
    Transition {
        token: ActionToken::FloodLeak,
        from: &[Scene::Flood],
        resolve: |_| {
            Step::new()
                .flag(Flag::LeakedDocuments)
                .evidence("flood_maps")
                .act(Act::Act4)
                .render(
                    Script::new()
                        .text("By morning, copies are taped to every lamppost in Crestfall. The rain can't wash them off fast enough.")
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    Transition {
        token: ActionToken::FloodArchive,
        from: &[Scene::Flood],
        resolve: |_| {
            Step::new()
                .flag(Flag::ArchivedMaps)
                .evidence("flood_maps")
                .render(
                    Script::new()
                        .audio(
                            MediaAsset::DripAudio,
                            "Water drips somewhere between the shelves.",
                            "_Somewhere between the shelves, water drips._",
                        )
                        .text("You file the maps under a drawer label that doesn't exist. The Archivist watches from the stacks.")
                        .prompt(
                            "They are waiting for you to ask.",
                            &[("⚖️ Press them for answers", ActionToken::ArchPress)],
                        ),
                    Scene::FloodArchived,
                )
        },
    },
    Transition {
        token: ActionToken::FloodBurn,
        from: &[Scene::Flood],
        resolve: |_| {
            Step::new()
                .flag(Flag::BurnedMaps)
                .act(Act::Act4)
                .render(
                    Script::new()
                        .animate(
                            &[
                                "🔥 The corner catches.",
                                "🔥 Route B curls into ash.",
                                "🔥 Someone's signature smokes and is gone.",
                            ],
                            TextStyle::Plain,
                            900,
                        )
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    // Archivist arc
    Transition {
        token: ActionToken::ArchConfront,
        from: &[Scene::Archivist],
        resolve: |_| {
            Step::new()
                .flag(Flag::ArchivistConfronted)
                .evidence("archivist_confession")
                .act(Act::Act4)
                .render(
                    Script::new()
                        .text("'The boats went to the chapel,' they finally say. 'Not to the houses. Not to her.'")
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    Transition {
        token: ActionToken::ArchRecord,
        from: &[Scene::Archivist],
        resolve: |_| {
            Step::new()
                .flag(Flag::RecordedArchivist)
                .evidence("archivist_recording")
                .act(Act::Act4)
                .render(
                    Script::new()
                        .markdown("_The red dot on your phone blinks. Every word is on tape now._")
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    Transition {
        token: ActionToken::ArchLeave,
        from: &[Scene::Archivist],
        resolve: |_| {
            Step::new()
                .flag(Flag::WalkedAway)
                .act(Act::Act4)
                .render(
                    Script::new()
                        .text("You leave the Archivist alone with their files. Behind you, a drawer slides shut by itself.")
                        .pause(600)
                        .then(scripts::collapse()),
                    Scene::Collapse,
                )
        },
    },
    // Act 4
    Transition {
        token: ActionToken::A4Break,
        from: &[Scene::Collapse],
        resolve: |session| {
            Step::new()
                .choice(Flag::Route, "break")
                .act(Act::Act5)
                .render(
                    narrate(BREAK_ROUTE, session).then(scripts::finale()),
                    Scene::Finale,
                )
        },
    },
    Transition {
        token: ActionToken::A4Burn,
        from: &[Scene::Collapse],
        resolve: |_| {
            Step::new()
                .choice(Flag::Route, "burn")
                .act(Act::Act5)
                .render(
                    Script::new()
                        .text("You strike a match over the files. The fire reads them before you can.")
                        .pause(700)
                        .then(scripts::finale()),
                    Scene::Finale,
                )
        },
    },
    Transition {
        token: ActionToken::A4Hunt,
        from: &[Scene::Collapse],
        resolve: |session| {
            Step::new()
                .choice(Flag::Route, "hunt")
                .act(Act::Act5)
                .render(
                    narrate(HUNT_ROUTE, session).then(scripts::finale()),
                    Scene::Finale,
                )
        },
    },
    // Endings
    Transition {
        token: ActionToken::EndSave,
        from: &[Scene::Finale],
        resolve: |session| {
            Step::new()
                .choice(Flag::Ending, "save")
                .act(Act::End)
                .render(
                    narrate(SAVE_ENDING, session).then(scripts::curtain()),
                    Scene::Ending,
                )
        },
    },
    Transition {
        token: ActionToken::EndVeil,
        from: &[Scene::Finale],
        resolve: |session| {
            Step::new()
                .choice(Flag::Ending, "veil")
                .act(Act::End)
                .render(
                    Script::new()
                        .animate(
                            &["🪞 ▓▓▓▓▓▓▓▓▓▓", "🪞 ▓▓▓░░▓▓░▓▓", "🪞 ░░ C R E S T F A L L ░░"],
                            TextStyle::Plain,
                            1000,
                        )
                        .then(narrate(VEIL_ENDING, session))
                        .then(scripts::curtain()),
                    Scene::Ending,
                )
        },
    },
    Transition {
        token: ActionToken::EndBurn,
        from: &[Scene::Finale],
        resolve: |session| {
            Step::new()
                .choice(Flag::Ending, "burn")
                .act(Act::End)
                .render(
                    Script::new()
                        .photo(MediaAsset::RainGif, "Even the rain turns to steam.")
                        .then(narrate(BURN_ENDING, session))
                        .then(scripts::curtain()),
                    Scene::Ending,
                )
        },
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use ashen_veil_core::ids::{ChatId, UserId};

    fn session() -> Session {
        Session::new(ChatId(7), UserId(7), None)
    }

    #[test]
    fn test_every_token_has_exactly_one_transition() {
        for token in ActionToken::ALL {
            let rows = TRANSITIONS.iter().filter(|t| t.token == token).count();
            assert_eq!(rows, 1, "token {token} has {rows} rows");
        }
        assert_eq!(TRANSITIONS.len(), ActionToken::ALL.len());
    }

    #[test]
    fn test_prompted_tokens_are_accepted_by_the_scene_they_lead_to() {
        // For every transition, the buttons it renders must be valid in the
        // scene it enters; otherwise the player would be offered a dead end.
        for transition in TRANSITIONS {
            let step = transition.resolve(&session());
            let next = step
                .events
                .iter()
                .find_map(|event| match event {
                    StoryEvent::SceneEntered { scene } => Some(*scene),
                    _ => None,
                })
                .expect("every transition enters a scene");
            let plan = crate::domain::render::RenderPlan::started(step.script);

            for offered in plan.offered_tokens() {
                let token: ActionToken = offered.parse().unwrap();
                assert!(
                    transition_for(token).unwrap().accepts(next),
                    "{} offers {offered} which {next} rejects",
                    transition.token
                );
            }
        }
    }

    #[test]
    fn test_every_scene_except_ending_is_reachable_from_some_transition() {
        let entered: HashSet<Scene> = TRANSITIONS
            .iter()
            .flat_map(|t| t.resolve(&session()).events)
            .filter_map(|event| match event {
                StoryEvent::SceneEntered { scene } => Some(scene),
                _ => None,
            })
            .collect();

        for scene in [
            Scene::Fracture,
            Scene::Investigate,
            Scene::MerrickLead,
            Scene::ArchiveLead,
            Scene::CallLead,
            Scene::Morgue,
            Scene::MorguePhoto,
            Scene::Flood,
            Scene::FloodArchived,
            Scene::Archivist,
            Scene::Collapse,
            Scene::Finale,
            Scene::Ending,
        ] {
            assert!(entered.contains(&scene), "{scene} is unreachable");
        }
    }

    #[test]
    fn test_press_for_answers_converges_from_several_arcs() {
        let press = transition_for(ActionToken::ArchPress).unwrap();

        assert!(press.accepts(Scene::ArchiveLead));
        assert!(press.accepts(Scene::CallLead));
        assert!(press.accepts(Scene::MorguePhoto));
        assert!(press.accepts(Scene::FloodArchived));
        assert!(!press.accepts(Scene::Opening));
    }

    #[test]
    fn test_only_ending_tokens_advance_to_end() {
        for transition in TRANSITIONS {
            let reaches_end = transition
                .resolve(&session())
                .events
                .contains(&StoryEvent::ActAdvanced { act: Act::End });
            assert_eq!(reaches_end, transition.token.is_ending(), "{}", transition.token);
        }
    }

    #[test]
    fn test_select_prefers_the_first_matching_row() {
        // Arrange
        let mut session = session();
        session.apply(&StoryEvent::FlagRecorded {
            key: "lila_hidden".to_owned(),
            value: FlagValue::Bool(true),
        });

        // Act
        let variant = select(SAVE_ENDING, &session).unwrap();

        // Assert
        assert_eq!(variant.name, "hidden");
    }

    #[test]
    fn test_decision_tables_end_with_a_catch_all_row() {
        for table in [BREAK_ROUTE, HUNT_ROUTE, SAVE_ENDING, VEIL_ENDING, BURN_ENDING] {
            assert!(matches!(table.last().unwrap().when, Condition::Otherwise));
        }
    }
}
