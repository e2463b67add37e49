//! Core library exports for the TechNova storefront.
//!
//! This crate exposes the domain, forms, models, repositories, routes and
//! service layers used by the TechNova web application.

pub mod auth;
pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod session;
