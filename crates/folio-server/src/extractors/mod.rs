//! Extractores de parametros de ruta.

pub mod path;
