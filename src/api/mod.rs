pub mod router;
pub mod signature;
pub mod webhook;
