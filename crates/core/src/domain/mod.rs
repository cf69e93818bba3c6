pub mod portfolio;
pub mod request;
