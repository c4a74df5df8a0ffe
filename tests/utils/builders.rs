use wordle_ledger::IncomingMessage;

/// Builds announcement messages in the shape the puzzle bot posts them
pub struct AnnouncementBuilder {
    group_streak: u32,
    lines: Vec<String>,
}

impl AnnouncementBuilder {
    pub fn new() -> Self {
        Self {
            group_streak: 1,
            lines: Vec::new(),
        }
    }

    pub fn group_streak(mut self, days: u32) -> Self {
        self.group_streak = days;
        self
    }

    /// Adds a result line; `score` is "1".."6" or "X"
    pub fn line(mut self, score: &str, mentions: &[&str]) -> Self {
        self.lines.push(format!("{score}/6: {}", mentions.join(" ")));
        self
    }

    pub fn crowned(mut self, score: &str, mentions: &[&str]) -> Self {
        self.lines
            .push(format!("👑 {score}/6: {}", mentions.join(" ")));
        self
    }

    pub fn text(&self) -> String {
        format!(
            "**Your group is on a {} day streak!** 🔥 Here are yesterday's results:\n{}",
            self.group_streak,
            self.lines.join("\n")
        )
    }

    pub fn build(&self, message_id: &str) -> IncomingMessage {
        IncomingMessage::new(message_id, self.text())
    }
}

pub fn mention(id: u64) -> String {
    format!("<@{id}>")
}
