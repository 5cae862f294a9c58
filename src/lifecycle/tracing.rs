//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber. Verbosity comes
//! from `RUST_LOG`:
//!
//! ```bash
//! # Meals and shutdown only
//! RUST_LOG=info cargo run
//!
//! # Every pick-up and put-down, with seq numbers
//! RUST_LOG=debug cargo run
//!
//! # Eating countdowns as well
//! RUST_LOG=trace cargo run
//! ```
//!
//! Each actor's loop runs inside an `actor` span carrying its id, so lines
//! from the protocol read like:
//!
//! ```text
//! INFO actor: Actor seated actor=actor_4 first=resource_0 second=resource_4
//! DEBUG actor: Acquired actor=actor_4 index=resource_0 seq=7
//! INFO actor: State actor=actor_4 state=eating
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
