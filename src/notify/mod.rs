//! Email notifications.
//!
//! Booking writes never send email inline: they enqueue outbox rows and
//! return. The dispatcher task drains the outbox, renders templates, and
//! talks to the delivery API, retrying independently of the write path.

pub mod mailer;
pub mod outbox;
pub mod routes;

pub use mailer::{Mailer, MailerError, NoopMailer, ResendMailer};
pub use outbox::run_outbox_dispatcher;

/// The notification kinds the booking lifecycle can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    AppointmentCreated,
    AppointmentConfirmed,
    AppointmentCancelled,
    AdminNewBooking,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AppointmentCreated => "appointment_created",
            NotificationType::AppointmentConfirmed => "appointment_confirmed",
            NotificationType::AppointmentCancelled => "appointment_cancelled",
            NotificationType::AdminNewBooking => "admin_new_booking",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appointment_created" => Some(NotificationType::AppointmentCreated),
            "appointment_confirmed" => Some(NotificationType::AppointmentConfirmed),
            "appointment_cancelled" => Some(NotificationType::AppointmentCancelled),
            "admin_new_booking" => Some(NotificationType::AdminNewBooking),
            _ => None,
        }
    }

    /// Whether this notification goes to the client or only to the admin.
    pub fn is_client_facing(&self) -> bool {
        !matches!(self, NotificationType::AdminNewBooking)
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
