pub mod dashboard;
pub mod health;
pub mod properties;
pub mod rent;
pub mod rooms;
pub mod tenants;
