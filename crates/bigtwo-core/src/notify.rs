// Turn-change notifications.

/// Which notification to raise on a turn change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The turn just passed to the local player.
    SelfTurn,
    /// The turn just passed to someone else.
    OpponentTurn,
}

/// Decide whether a turn change should raise a notification.
///
/// Silent while the channel is locked, on the first snapshot of a session
/// (`previous` is `None`), when nobody holds the turn, and when the turn owner
/// did not change.
pub fn turn_notification(
    previous: Option<&str>,
    current: Option<&str>,
    you: Option<&str>,
    channel_unlocked: bool,
) -> Option<NotificationKind> {
    if !channel_unlocked {
        return None;
    }
    let previous = previous?;
    let current = current?;
    if current == previous {
        return None;
    }
    if you == Some(current) {
        Some(NotificationKind::SelfTurn)
    } else {
        Some(NotificationKind::OpponentTurn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_on_first_snapshot() {
        assert_eq!(turn_notification(None, Some("p2"), Some("p1"), true), None);
    }

    #[test]
    fn silent_when_locked() {
        assert_eq!(turn_notification(Some("p2"), Some("p1"), Some("p1"), false), None);
    }

    #[test]
    fn silent_without_turn_change() {
        assert_eq!(turn_notification(Some("p2"), Some("p2"), Some("p1"), true), None);
    }

    #[test]
    fn self_turn_when_turn_reaches_you() {
        assert_eq!(
            turn_notification(Some("p2"), Some("p1"), Some("p1"), true),
            Some(NotificationKind::SelfTurn)
        );
    }

    #[test]
    fn opponent_turn_otherwise() {
        assert_eq!(
            turn_notification(Some("p1"), Some("p3"), Some("p1"), true),
            Some(NotificationKind::OpponentTurn)
        );
    }

    #[test]
    fn silent_when_turn_owner_cleared() {
        assert_eq!(turn_notification(Some("p1"), None, Some("p1"), true), None);
    }

    #[test]
    fn unknown_identity_never_counts_as_self() {
        assert_eq!(
            turn_notification(Some("p1"), Some("p2"), None, true),
            Some(NotificationKind::OpponentTurn)
        );
    }
}
