pub use super::event::Entity as Event;
pub use super::event_attendee::Entity as EventAttendee;
pub use super::event_attendee_contribution::Entity as EventAttendeeContribution;
pub use super::event_chat_message::Entity as EventChatMessage;
pub use super::event_chat_message_reaction::Entity as EventChatMessageReaction;
pub use super::event_invitation::Entity as EventInvitation;
pub use super::event_segment::Entity as EventSegment;
pub use super::user::Entity as User;
pub use super::user_allergy::Entity as UserAllergy;
pub use super::user_otp::Entity as UserOtp;
