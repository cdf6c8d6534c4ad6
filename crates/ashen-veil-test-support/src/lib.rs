//! Shared test doubles for the Ashen Veil narrative engine.

mod clock;
mod pacer;
mod rng;
mod transport;

pub use clock::FixedClock;
pub use pacer::RecordingPacer;
pub use rng::{MockRng, SequenceRng};
pub use transport::{FailingTransport, RecordingTransport, Sent};
