use regex::Regex;
use std::sync::LazyLock;

/// Phrase that opens every group-result announcement. Matched exactly.
pub const TRIGGER_PHRASE: &str = "Your group is on";

static RESULTS_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)here are yesterday['’]s results:").expect("valid results marker regex")
});

static GROUP_STREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Your group is on an? (\d+) day streak").expect("valid group streak regex")
});

/// A message recognised as a daily group-result announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement<'a> {
    /// Group streak figure announced in the header, when present
    pub group_streak: Option<u32>,
    /// Everything after the results marker
    pub body: &'a str,
}

impl<'a> Announcement<'a> {
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.body.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

/// Decides whether `text` is a group-result announcement.
///
/// Both the trigger phrase and the results marker must be present; anything
/// else is not applicable and yields `None`.
pub fn classify(text: &str) -> Option<Announcement<'_>> {
    if !text.contains(TRIGGER_PHRASE) {
        return None;
    }

    let marker = RESULTS_MARKER_RE.find(text)?;

    let group_streak = GROUP_STREAK_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    Some(Announcement {
        group_streak,
        body: &text[marker.end()..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn recognises_announcement_and_extracts_body() {
        let text = "**Your group is on a 3 day streak!** Here are yesterday's results:\n3/6: <@111>";
        let announcement = classify(text).expect("should classify");

        assert_eq!(announcement.group_streak, Some(3));
        assert_eq!(announcement.lines().collect::<Vec<_>>(), vec!["3/6: <@111>"]);
    }

    #[rstest]
    #[case("Here are yesterday's results:\n3/6: <@1>")]
    #[case("**Your group is on a 2 day streak!**\n3/6: <@1>")]
    #[case("your group is on a 2 day streak! Here are yesterday's results:\n3/6: <@1>")]
    #[case("")]
    fn rejects_messages_missing_a_phrase(#[case] text: &str) {
        assert!(classify(text).is_none());
    }

    #[rstest]
    #[case("Your group is on fire! HERE ARE YESTERDAY'S RESULTS:\n4/6: <@1>")]
    #[case("Your group is on a 9 day streak! Here are yesterday’s results:\n4/6: <@1>")]
    fn marker_is_case_insensitive_and_accepts_curly_apostrophe(#[case] text: &str) {
        let announcement = classify(text).expect("should classify");
        assert_eq!(announcement.lines().next(), Some("4/6: <@1>"));
    }

    #[test]
    fn group_streak_is_optional() {
        let announcement =
            classify("Your group is on fire! Here are yesterday's results:").unwrap();
        assert_eq!(announcement.group_streak, None);
        assert_eq!(announcement.lines().count(), 0);
    }
}
