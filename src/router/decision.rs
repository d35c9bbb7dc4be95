// Routing decision logic

pub const EVENTS_CALENDAR_URL: &str = "https://outlook.office365.com/calendar/published/6b0d6d7d1cac4e7c87760b7b8802fc09@northeastern.edu/08cbbcccb8f34b76833c3bac4e30967812111475007683985818/calendar.html";

pub const FEEDBACK_FORM_URL: &str = "https://forms.gle/d5wvGxGH7A6uCsBH7";

/// Fixed replies that bypass the completion delegate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedReply {
    EventsCalendar,
    FeedbackForm,
}

impl CannedReply {
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedReply::EventsCalendar => "events_calendar",
            CannedReply::FeedbackForm => "feedback_form",
        }
    }

    pub fn text(&self) -> String {
        match self {
            CannedReply::EventsCalendar => {
                format!("Check out upcoming Northeastern events here: {}", EVENTS_CALENDAR_URL)
            }
            CannedReply::FeedbackForm => format!(
                "I'd love to hear your feedback! Please share it here: {}",
                FEEDBACK_FORM_URL
            ),
        }
    }
}

/// Case-insensitive substring rule
#[derive(Debug, Clone)]
pub struct KeywordRule {
    keywords: Vec<&'static str>,
    reply: CannedReply,
}

impl KeywordRule {
    /// Keywords must be lowercase
    pub fn new(keywords: &[&'static str], reply: CannedReply) -> Self {
        Self {
            keywords: keywords.to_vec(),
            reply,
        }
    }

    /// `lowered` must already be lowercased
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Canned(CannedReply),
    Delegate,
}

/// Ordered keyword rules; the first match wins
#[derive(Debug, Clone)]
pub struct Router {
    rules: Vec<KeywordRule>,
}

impl Router {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Make a routing decision for a message
    pub fn route(&self, message: &str) -> RouteDecision {
        let lowered = message.to_lowercase();

        match self.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => {
                tracing::debug!(reply = rule.reply.as_str(), "Routing decision: CANNED");
                RouteDecision::Canned(rule.reply)
            }
            None => {
                tracing::debug!("Routing decision: DELEGATE");
                RouteDecision::Delegate
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(
                &["event", "happening", "calendar", "schedule"],
                CannedReply::EventsCalendar,
            ),
            KeywordRule::new(&["feedback"], CannedReply::FeedbackForm),
        ])
    }
}
