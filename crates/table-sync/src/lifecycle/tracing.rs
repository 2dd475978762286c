//! # Tracing Setup
//!
//! Structured logging for the whole system. Every layer logs with fields rather than
//! formatted strings, so a single table can be followed across the store, the engine and
//! the fan-out:
//!
//! ```text
//! INFO create_table{caller=demo name="Patio"}: Inserted entity_type="Table" id=K3M9P1 size=1
//! INFO create_table{caller=demo name="Patio"}: Table created table_id=K3M9P1 table_name=Patio
//! INFO update_status{caller=demo id="K3M9P1" status="processing"}: Table status updated table_id=K3M9P1 status=processing
//! WARN update_status{...}:notify{device=http://192.168.4.1 status=Processing}: Device unreachable status=processing error=...
//! INFO update_status{...}: Status fanned out table_id=K3M9P1 device_notified=false delivered=1
//! ```
//!
//! `RUST_LOG` picks the level:
//!
//! ```bash
//! RUST_LOG=info cargo run -p table-sync     # Mutations and fan-out results
//! RUST_LOG=debug cargo run -p table-sync    # Store requests and payloads
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type and span names already say where a line comes from
        .compact()
        .init();
}
