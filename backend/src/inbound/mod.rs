//! Inbound adapters that translate external requests into calls on the
//! driving ports, keeping framework details at the edge.

pub mod http;
