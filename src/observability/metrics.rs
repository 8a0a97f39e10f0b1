//! Metrics collection.
//!
//! # Metrics
//! - `station_broadcast_total` (counter): broadcasts by outcome
//! - `station_broadcast_duration_seconds` (histogram): signer acquisition to result
//! - `station_proposals_encoded_total` (counter): envelopes built, by proposal kind
//! - `station_conversion_noop_total` (counter): conversions passed through, by op
//! - `station_wallets_created_total` (counter): wallets built, by wallet name
//!
//! Without an installed recorder these calls are no-ops.

use std::time::Duration;

pub fn record_broadcast(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("station_broadcast_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("station_broadcast_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_proposal_encoded(kind: &'static str) {
    ::metrics::counter!("station_proposals_encoded_total", "kind" => kind).increment(1);
}

pub fn record_conversion_noop(op: &'static str) {
    ::metrics::counter!("station_conversion_noop_total", "op" => op).increment(1);
}

pub fn record_wallet_created(wallet: &'static str) {
    ::metrics::counter!("station_wallets_created_total", "wallet" => wallet).increment(1);
}
