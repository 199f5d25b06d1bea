// disable miri tests as Command is not supported yet
// See: https://github.com/rust-lang/miri/issues/2057
#[cfg(all(not(miri), target_family = "unix"))]
mod local_binary;
mod smi_check;
mod traffic_split;
