//! Servicios del sistema
//!
//! La lógica de orquestación entre la persistencia y el motor de
//! fixture.

pub mod fixture_service;
