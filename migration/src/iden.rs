use sea_orm_migration::prelude::*;

// Define table names
#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    DateOfBirth,
    PhoneNumber,
    Verified,
    Locked,
    LastLogin,
}

#[derive(DeriveIden)]
pub enum UserAllergy {
    Table,
    Id,
    UserId,
    Allergy,
}

#[derive(DeriveIden)]
pub enum UserOtp {
    Table,
    Id,
    UserId,
    Otp,
    Expiry,
    Consumed,
}

#[derive(DeriveIden)]
pub enum Event {
    Table,
    Id,
    Name,
    Date,
    Location,
    Description,
    Icon,
    HostId,
}

#[derive(DeriveIden)]
pub enum EventSegment {
    Table,
    Id,
    Name,
    EventId,
}

#[derive(DeriveIden)]
pub enum EventAttendee {
    Table,
    Id,
    UserId,
    SegmentId,
}

#[derive(DeriveIden)]
pub enum EventAttendeeContribution {
    Table,
    Id,
    Item,
    Description,
    Quantity,
    AttendeeId,
}

#[derive(DeriveIden)]
pub enum EventInvitation {
    Table,
    Id,
    SenderId,
    RecipientId,
    EventId,
    Message,
    Viewed,
    RsvpStatus,
}

#[derive(DeriveIden)]
pub enum EventChatMessage {
    Table,
    Id,
    UserId,
    EventId,
    Message,
}

#[derive(DeriveIden)]
pub enum EventChatMessageReaction {
    Table,
    Id,
    MessageId,
    UserId,
    Reaction,
}
