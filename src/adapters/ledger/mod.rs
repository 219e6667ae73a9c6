//! Booking ledger adapters.

mod in_memory_booking_ledger;

pub use in_memory_booking_ledger::InMemoryBookingLedger;
