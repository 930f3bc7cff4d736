pub mod additional_service;
pub mod discount_code;
pub mod district_surcharge;
pub mod itinerary;
pub mod participant;
pub mod trip;
pub mod user;
