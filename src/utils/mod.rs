pub mod jwt;
pub mod phone;
pub mod pricing;
pub mod status;
