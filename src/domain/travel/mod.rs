//! Travel domain - offers, search parameters, bookings and customer profiles.
//!
//! Pure value types shared by every layer. Nothing here performs I/O.

mod booking;
mod errors;
mod offer;
mod profile;
mod search;

pub use booking::{BookingConfirmation, BookingRecord, BookingSelection};
pub use errors::TravelError;
pub use offer::{Money, Offer, OfferCategory};
pub use profile::{CustomerProfile, ProfileUpdate};
pub use search::{
    ActivityQuery, CategoryFailure, FlightQuery, HotelQuery, SearchParams, SearchResults,
};
