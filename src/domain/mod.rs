pub mod amount;
pub mod mint;
pub mod notification;
pub mod token;
