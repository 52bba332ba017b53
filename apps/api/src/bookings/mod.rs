// Sales-pipeline bookings, proxied to Modal.

pub mod handlers;
