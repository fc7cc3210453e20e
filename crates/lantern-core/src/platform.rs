//! Seams to the presentation shell's native facilities.
//!
//! The core stays headless: native dialogs and the system clipboard are
//! owned by whatever shell embeds it (Tauri, egui, a test harness), plugged
//! in through these traits.

use async_trait::async_trait;

use crate::error::Result;

/// Asks the user to confirm a destructive action.
///
/// Deletion of sessions and groups must go through this seam before any
/// backend call; declining aborts the operation with no state change.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Presents `message` and returns whether the user confirmed.
    async fn confirm(&self, message: &str) -> bool;
}

/// Writes text to the system clipboard.
pub trait Clipboard: Send + Sync {
    /// Places `text` on the clipboard.
    fn write_text(&self, text: &str) -> Result<()>;
}
