//! Contact form: submission limiter, HTML email rendering and dispatch.

pub mod escape;
pub mod limiter;
pub mod mailer;
pub mod routes;
pub mod templates;

pub use limiter::{Admission, Clock, RateLimitConfig, RateLimiter, SweepPolicy, SystemClock};
pub use mailer::{MailBackend, MailConfig, Mailer, create_mailer};
pub use routes::{ContactState, contact_routes};
pub use templates::{ContactSubmission, OutboundEmail};
