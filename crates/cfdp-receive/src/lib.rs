//! Receive-side state machine for a CCSDS File Delivery Protocol (CFDP)
//! engine.
//!
//! This crate models the receiving half of a single CFDP channel: given an
//! already-decoded [`pdu::InboundPdu`] and a bundle of
//! [`collab::Collaborators`] (backing file, outgoing-PDU transmitter, timers,
//! chunk tracker, event sink, teardown hook), it runs the Class-1
//! (unacknowledged) or Class-2 (acknowledged) receive state machine and
//! drives the periodic [`tick::r_tick`] work a real channel needs between
//! PDU arrivals. PDU wire encoding/decoding, the channel scheduler, and the
//! transport itself are all out of scope — those are the embedding engine's
//! job.
//!
//! # Entry points
//!
//! - [`init::r_init`] — prepare a newly-created transaction to begin
//!   receiving.
//! - [`class1::r1_recv`] — dispatch one PDU to a Class-1 transaction.
//! - [`class2::r2_recv`] — dispatch one PDU to a Class-2 transaction.
//! - [`tick::r_tick`] — advance timers and flush pending sends.
//! - [`cancel::r_cancel`] — abandon a transaction on external request.

pub mod cancel;
pub mod chunks;
pub mod class1;
pub mod class2;
pub mod collab;
pub mod config;
pub mod counters;
pub mod crc;
pub mod events;
pub mod init;
pub mod pdu;
pub mod sink;
pub mod status;
pub mod tick;
pub mod transaction;

#[cfg(any(test, feature = "test-support"))]
pub mod testutil;
