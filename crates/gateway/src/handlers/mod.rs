//! Gateway request handlers

pub mod health;
pub mod professors;
pub mod rankings;
pub mod replies;
pub mod reviews;
pub mod universities;
