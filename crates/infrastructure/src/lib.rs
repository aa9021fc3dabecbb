//! Ingress DNS Infrastructure Layer
pub mod dns;
pub mod inventory;
