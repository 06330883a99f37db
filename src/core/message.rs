//! Player-facing message log.
//!
//! Every rule-legality cancellation produces exactly one explanatory
//! message attributed to the acting player; ability initiations and
//! zone redirects also announce themselves here. The log is the
//! chat-style surface the embedding UI renders, and the thing tests
//! assert against.
//!
//! Engine-fatal failures never land here - they indicate a defect and
//! surface as errors instead.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// One chat-style message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The player the message is attributed to. `None` for engine
    /// announcements (e.g. a zone redirect).
    pub speaker: Option<PlayerId>,

    /// Message text.
    pub text: String,
}

/// Append-only buffer of game messages.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message attributed to a player.
    pub fn say(&mut self, speaker: PlayerId, text: impl Into<String>) {
        self.entries.push(Message {
            speaker: Some(speaker),
            text: text.into(),
        });
    }

    /// Append an engine announcement with no speaker.
    pub fn announce(&mut self, text: impl Into<String>) {
        self.entries.push(Message {
            speaker: None,
            text: text.into(),
        });
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries containing the given fragment.
    pub fn containing<'a>(&'a self, fragment: &'a str) -> impl Iterator<Item = &'a Message> {
        self.entries.iter().filter(move |m| m.text.contains(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_and_query() {
        let mut log = MessageLog::new();
        assert!(log.is_empty());

        log.say(PlayerId::new(0), "plays Scout");
        log.announce("card was returned to its owner's deck");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].speaker, Some(PlayerId::new(0)));
        assert_eq!(log.entries()[1].speaker, None);
        assert_eq!(log.containing("deck").count(), 1);
        assert_eq!(log.containing("Scout").count(), 1);
    }

    #[test]
    fn test_serialization() {
        let mut log = MessageLog::new();
        log.say(PlayerId::new(1), "passes");

        let json = serde_json::to_string(&log).unwrap();
        let back: MessageLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries(), log.entries());
    }
}
