// # Linux Probes
//
// This crate provides the OS-facing side of the hotspot monitor:
//
// - [`SystemProbe`]: `StatusProbe` backed by `ip`, `systemctl` and an
//   interface-bound HTTP lookup of the external address
// - [`ScriptRunner`]: `Runner` that executes the start/stop scripts
//
// ## Failure Model
//
// Every external call has a time bound. Ordinary absence (interface not
// configured, lookup returned nothing) is reported as data; a probe that
// could not run at all is reported as an error, which the core degrades to
// the absent variant. Nothing here retries.
//
// ## Platform Support
//
// The probes shell out to iproute2 and systemd and are meant for Linux.
// Interface binding for external-IP lookups uses `SO_BINDTODEVICE` and is
// only applied on Linux-like targets; elsewhere the lookup uses the default
// route.

mod command;
mod parse;
mod probe;
mod runner;

pub use parse::{parse_ipv4_addr, parse_link_up, parse_systemctl_show};
pub use probe::{SystemProbe, DEFAULT_WAN_IP_URL};
pub use runner::ScriptRunner;
