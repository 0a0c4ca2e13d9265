//! Alert message construction

/// Direction of a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentOffline,
    CameOnline,
}

impl Transition {
    /// Compare the persisted state with the observed one
    pub fn between(previous: bool, observed: bool) -> Option<Self> {
        match (previous, observed) {
            (true, false) => Some(Transition::WentOffline),
            (false, true) => Some(Transition::CameOnline),
            _ => None,
        }
    }

    /// State the transition ends in
    pub fn target(self) -> bool {
        matches!(self, Transition::CameOnline)
    }

    pub fn subject(self, device_name: &str) -> String {
        match self {
            Transition::WentOffline => format!("{} has gone offline", device_name),
            Transition::CameOnline => format!("{} is back online", device_name),
        }
    }
}

/// A one-shot notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn for_transition(transition: Transition, device_name: &str, body: impl Into<String>) -> Self {
        Self::new(transition.subject(device_name), body)
    }
}
