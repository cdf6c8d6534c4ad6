//! In-place frame animation.

use std::time::Duration;

use ashen_veil_core::ids::{ChatId, MessageId};
use ashen_veil_core::pacer::Pacer;
use ashen_veil_core::transport::{TextStyle, Transport, TransportError};
use tracing::{debug, warn};

/// Text sent when an animation has no frames.
pub const EMPTY_FRAME: &str = "...";

/// Shows `frames` as one message rewritten in place, waiting `beat` between
/// consecutive frames.
///
/// When an edit is refused the frame is sent as a new message, which becomes
/// the target of later edits. Frames are never reordered, and none is skipped
/// while the transport accepts either the edit or the fallback send. A frame
/// for which both fail is logged and dropped; later edits keep targeting the
/// previous message. Returns the handle of the message last written to.
///
/// # Errors
///
/// Returns the transport error if the first frame cannot be sent at all.
pub async fn animate(
    transport: &dyn Transport,
    pacer: &dyn Pacer,
    chat_id: ChatId,
    frames: &[String],
    style: TextStyle,
    beat: Duration,
) -> Result<MessageId, TransportError> {
    let Some((first, rest)) = frames.split_first() else {
        return transport.send_text(chat_id, EMPTY_FRAME, style).await;
    };

    let mut target = transport.send_text(chat_id, first, style).await?;
    for frame in rest {
        pacer.pause(beat).await;
        if let Err(e) = transport.edit_text(chat_id, target, frame, style).await {
            debug!(
                %chat_id,
                message_id = %target,
                error = %e,
                "Edit refused, sending frame as new message"
            );
            match transport.send_text(chat_id, frame, style).await {
                Ok(message_id) => target = message_id,
                Err(e) => warn!(%chat_id, error = %e, "Fallback frame send failed"),
            }
        }
    }
    Ok(target)
}
