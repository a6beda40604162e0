//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de variables de entorno
//! y las perillas del motor de fixture.

pub mod environment;
pub mod scheduling;

pub use environment::*;
