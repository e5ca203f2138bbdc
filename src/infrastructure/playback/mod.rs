//! Spoken reply playback adapters

mod rodio;

use std::sync::Arc;
use std::time::Duration;

pub use rodio::RodioReplyPlayer;

use crate::application::ports::ReplyPlayer;

/// Create a reply player if replies should be heard
pub fn create_reply_player(enabled: bool, timeout: Duration) -> Option<Arc<dyn ReplyPlayer>> {
    if enabled {
        Some(Arc::new(RodioReplyPlayer::new(timeout)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_means_no_player() {
        assert!(create_reply_player(false, Duration::from_secs(1)).is_none());
        assert!(create_reply_player(true, Duration::from_secs(1)).is_some());
    }
}
