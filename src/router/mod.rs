// Router module
// Keyword rules and the chat entry point

mod decision;
mod message_router;

pub use decision::{
    CannedReply, KeywordRule, RouteDecision, Router, EVENTS_CALENDAR_URL, FEEDBACK_FORM_URL,
};
pub use message_router::{ChatError, MessageRouter, UNAVAILABLE_MESSAGE};
