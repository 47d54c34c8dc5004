//! Service layer
//!
//! # Services
//!
//! - [`OtpService`] - staff password reset codes
//! - [`FeedbackService`] - contact form, reviews and replies
//! - [`notifier`] - email/SMS delivery backends
//! - [`documents`] - invoice and revenue report rendering
//! - [`invoice`] - invoice delivery after payment

pub mod documents;
pub mod feedback;
pub mod invoice;
pub mod notifier;
pub mod otp;

pub use feedback::FeedbackService;
pub use notifier::{Notification, Notifier, SharedNotifier};
pub use otp::{OtpService, OtpSettings};
