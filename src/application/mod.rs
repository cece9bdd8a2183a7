pub mod analyze;
pub mod builder;
pub mod compare;
pub mod extraction;
pub mod membership;
pub mod merge;
pub mod monitoring;
pub mod service;
pub mod session;
pub mod speed;
