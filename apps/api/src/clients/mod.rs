// Typed clients for the three upstream systems the dashboard proxies:
// EmailBison (campaign SaaS), HQ (people/company master data), and Modal
// (deals/bookings). Shared retry/decoding plumbing lives in transport.

pub mod emailbison;
pub mod hq;
pub mod modal;
mod transport;

pub use transport::UpstreamError;
