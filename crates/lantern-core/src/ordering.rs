//! Drop placement for drag-and-drop session reordering.
//!
//! Everything here is a pure function of the current session list and a drop
//! description; no backend access and no side effects, so the whole policy is
//! unit-testable without a UI harness.

use serde::{Deserialize, Serialize};

use crate::error::{LanternError, Result};
use crate::model::{Bucket, Session, SessionId};

/// Which half of a candidate row the pointer is hovering over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Top,
    Bottom,
}

/// The `(bucket, order)` a drop resolves to, ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub bucket: Bucket,
    pub order: i64,
}

/// Classifies a pointer position against a row's bounding box.
///
/// Upper half selects [`DropPosition::Top`], lower half [`DropPosition::Bottom`].
/// The caller re-invokes this on every hover event over a candidate row, not
/// just once on drop.
pub fn hover_position(pointer_y: f64, row_top: f64, row_height: f64) -> DropPosition {
    let midpoint = row_top + row_height / 2.0;
    if pointer_y < midpoint {
        DropPosition::Top
    } else {
        DropPosition::Bottom
    }
}

/// Computes the placement for a dragged session.
///
/// With no target session (drop on a group header or an empty bucket) the
/// session is assigned `order = 0` in the target bucket. With a target
/// session, `Top` reuses the target's order verbatim and `Bottom` uses
/// `target.order + 1`. Neither case renumbers existing members: collisions
/// are expected and resolved by the stable `(order, id)` sort, not treated
/// as an error.
///
/// # Errors
///
/// Returns `NotFound` if the dragged or target session id is not present in
/// `sessions`.
pub fn plan_move(
    sessions: &[Session],
    dragged_id: SessionId,
    target_bucket: Bucket,
    target_session_id: Option<SessionId>,
    position: DropPosition,
) -> Result<Placement> {
    if !sessions.iter().any(|s| s.id == dragged_id) {
        return Err(LanternError::not_found("session", dragged_id));
    }

    let Some(target_id) = target_session_id else {
        return Ok(Placement {
            bucket: target_bucket,
            order: 0,
        });
    };

    let target = sessions
        .iter()
        .find(|s| s.id == target_id)
        .ok_or_else(|| LanternError::not_found("session", target_id))?;

    let order = match position {
        DropPosition::Top => target.order,
        DropPosition::Bottom => target.order + 1,
    };

    Ok(Placement {
        bucket: target.bucket(),
        order,
    })
}

/// The sessions of one bucket, sorted by `(order, id)`.
///
/// This is the client-side stable sort that resolves order collisions; the
/// id tie-break places a session dropped "on top of" another before it.
pub fn bucket_sessions(sessions: &[Session], bucket: Bucket) -> Vec<&Session> {
    let mut members: Vec<&Session> = sessions.iter().filter(|s| s.bucket() == bucket).collect();
    members.sort_by_key(|s| (s.order, s.id));
    members
}
