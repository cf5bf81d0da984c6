pub mod auth;
pub mod dashboard;
pub mod external;
pub mod health;
pub mod journal;
pub mod mood;
pub mod reference;
pub mod settings;
