//! Integration test common infrastructure.
//!
//! Provides utilities for starting test servers, creating test clients,
//! and asserting on reply lines.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{SpawnedServer, TestServer};

/// Users most tests log in with, one per role.
#[allow(dead_code)]
pub const USERS: &[&str] = &[
    "alice:pw-alice:todos",
    "bob:pw-bob:Coordenador Regional",
    "dave:pw-dave:Operador de Nivel Medio",
    "root:pw-root:Administrador",
];
