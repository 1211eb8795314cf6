pub mod prelude;

pub mod event;
pub mod event_attendee;
pub mod event_attendee_contribution;
pub mod event_chat_message;
pub mod event_chat_message_reaction;
pub mod event_invitation;
pub mod event_segment;
pub mod user;
pub mod user_allergy;
pub mod user_otp;
