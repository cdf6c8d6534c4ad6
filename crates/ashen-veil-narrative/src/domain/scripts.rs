//! Scene scripts.
//!
//! One function per story beat. Each returns the fixed sequence of render
//! directives for that beat, ending with the prompt the session will wait
//! on. Scripts never decide the next action; that happens when the next
//! button press is dispatched.

use ashen_veil_core::transport::TextStyle;

use super::actions::ActionToken;
use super::render::{MediaAsset, Script};

/// Act 1: homecoming.
#[must_use]
pub fn opening() -> Script {
    Script::new()
        .animate(
            &[
                "🌧 *W  E  L  C  _  M  E   T O   C R E S T F A L L*",
                "🌧 *The rain tastes like salt…*",
                "🌧 *You’ve been gone 14 years.*",
            ],
            TextStyle::Markdown,
            1000,
        )
        .photo(
            MediaAsset::DeathCert,
            "*Tomorrow.* Your name. Signed in a dead hand.",
        )
        .prompt(
            "Where do you go first?",
            &[
                ("🔍 Inspect the package", ActionToken::A1Pkg),
                ("🏛 Town hall", ActionToken::A1Hall),
                ("⚓ Docks", ActionToken::A1Docks),
            ],
        )
        .pause(600)
        .photo(
            MediaAsset::Newspaper,
            "*LOCAL RESIDENT LAID TO REST* — dated tomorrow.",
        )
}

/// Act 2: the town fractures.
#[must_use]
pub fn fracture() -> Script {
    Script::new()
        .text(
            "Crestfall sleeps with one eye open.\n\
             Every window reflects something that isn’t there.\n\
             The streets feel stretched… like time’s been pulled thin.",
        )
        .prompt(
            "Where to begin?",
            &[
                ("🏚 Old home", ActionToken::A2Home),
                ("📂 Police archives", ActionToken::A2Arch),
                ("🌲 Forest clearing", ActionToken::A2Forest),
            ],
        )
}

/// Act 3: interrogations.
#[must_use]
pub fn investigate() -> Script {
    Script::new()
        .animate(
            &[
                "⛈ *The storm hasn’t stopped…*",
                "🧵 *You’re being threaded somewhere.*",
            ],
            TextStyle::Markdown,
            1000,
        )
        .prompt(
            "Interrogations — who do you confront?",
            &[
                ("🥃 Merrick (bar)", ActionToken::A3Merrick),
                ("📖 Archivist (archives)", ActionToken::A3Archivist),
                ("📞 Call the unknown number", ActionToken::A3Call),
            ],
        )
}

/// Act 4: the timeline collapses.
#[must_use]
pub fn collapse() -> Script {
    Script::new()
        .animate(
            &[
                "[03:12] She was already dead when you found her.",
                "[02:56] You can still save her.",
                "[03:08] Why is there blood on your hands?",
            ],
            TextStyle::Plain,
            900,
        )
        .markdown("*The investigation isn’t about the fire. It’s about who lit the match.*")
        .markdown("And every version says it was *you*.")
        .prompt(
            "Pre-finale — choose your approach:",
            &[
                ("🕰 Break the cycle", ActionToken::A4Break),
                ("🔥 Let it burn", ActionToken::A4Burn),
                ("🩸 Hunt your other self", ActionToken::A4Hunt),
            ],
        )
}

/// Act 5: the finale.
#[must_use]
pub fn finale() -> Script {
    Script::new()
        .animate(
            &[
                "\n\nThe match is already lit.",
                "The room inhales.",
                "Silence. Then heat.",
            ],
            TextStyle::Plain,
            1000,
        )
        .prompt(
            "Final choice — the consequence will echo:",
            &[
                ("👧 Save the girl", ActionToken::EndSave),
                ("🪞 Break the veil", ActionToken::EndVeil),
                ("🔥 Let it burn", ActionToken::EndBurn),
            ],
        )
}

/// Morgue arc: the drawers and the toe tag.
#[must_use]
pub fn morgue() -> Script {
    Script::new()
        .pause(600)
        .text("You slip through the morgue door. The air tastes of iron and old paper.")
        .photo(
            MediaAsset::MorgueInterior,
            "Fluorescent lights stutter above a row of metal drawers.",
        )
        .animate(
            &[
                "🔦 *Flashlight on: corridor. Rows and rows of drawers.*",
                "🔦 *Flashlight: a toe tag flutters under a sheet — name blurred.*",
                "🔦 *The beam finds a small yellow raincoat, folded beside a cold tray.*",
            ],
            TextStyle::Markdown,
            1100,
        )
        .audio(
            MediaAsset::HeartbeatAudio,
            "A distant heartbeat — is it yours?",
            "_You feel your pulse quicken._",
        )
        .animate(
            &[
                "TOE TAG: [ █████████ ]",
                "TOE TAG: [ E.  G R A Y ]",
                "TOE TAG: [ L I L A  G R A Y ]",
            ],
            TextStyle::Markdown,
            1200,
        )
        .pause(800)
        .prompt(
            "The tag says Lila Gray. You can try to revive, call for help, or quietly take evidence.",
            &[
                ("🔁 Attempt revival", ActionToken::MorgRevive),
                ("📢 Call for help", ActionToken::MorgCall),
                ("📸 Photograph quietly", ActionToken::MorgPhoto),
            ],
        )
}

/// Flood arc: the rescue maps.
#[must_use]
pub fn flood() -> Script {
    Script::new()
        .pause(600)
        .text("You find a stack of waterlogged rescue maps in a locked cabinet.")
        .photo(
            MediaAsset::FloodMap,
            "An old map with routes circled and one symbol repeated — a black veil emblem.",
        )
        .animate(
            &[
                "Map annotation: *Rescue route A — CLEAR*",
                "Map annotation: *Rescue route B — DIVERTED*",
                "Map annotation: *Official: 'Flood response — see addendum 11' — but addendum missing.*",
            ],
            TextStyle::Markdown,
            1000,
        )
        .text("A corner of the page has been burned methodically — someone tried to hide a signature.")
        .prompt(
            "You can photocopy and leak these maps, keep them for the archives, or burn them to protect someone.",
            &[
                ("🖨 Leak copies (public)", ActionToken::FloodLeak),
                ("🗄 Store in archive (quiet)", ActionToken::FloodArchive),
                ("🔥 Burn to protect", ActionToken::FloodBurn),
            ],
        )
}

/// Archivist arc: the betrayal.
#[must_use]
pub fn archivist_betrayal() -> Script {
    Script::new()
        .photo(
            MediaAsset::ArchivistPortrait,
            "The Archivist removes their glasses. Their eyes are clearer than you'd expect.",
        )
        .pause(800)
        .text("'I have been arranging the files for years,' they whisper. 'I only rearranged what had to be hidden.'")
        .animate(
            &[
                "Archivist: 'You shouldn't dig further.'",
                "Archivist: 'You should stop. You will only hurt yourself.'",
            ],
            TextStyle::Plain,
            1000,
        )
        .pause(1000)
        .blurt("_System: restoring archive snapshot..._")
        .pause(900)
        .blurt("_System: archive restored._")
        .pause(800)
        .text("Archivist: 'We promised to keep you safe. We also promised the town survived.'")
        .prompt(
            "Archivist reveals they helped cover the flood response. Choose how to react:",
            &[
                ("⚖️ Confront and demand truth", ActionToken::ArchConfront),
                ("🧭 Secretly record them", ActionToken::ArchRecord),
                ("💔 Walk away silently", ActionToken::ArchLeave),
            ],
        )
}

/// Closing card shared by every ending.
#[must_use]
pub fn curtain() -> Script {
    Script::new()
        .pause(1200)
        .markdown("*— THE ASHEN VEIL —*")
        .text("Use /start to walk back into the rain.")
}
