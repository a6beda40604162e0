//! Controllers del sistema
//!
//! Capa fina entre las rutas y los servicios: valida los requests,
//! traduce DTOs y delega la lógica al servicio correspondiente.

pub mod fixture_controller;
