pub mod dto;
pub mod encoder;
pub mod extract;
pub mod ports;
pub mod services;
pub mod upload;
