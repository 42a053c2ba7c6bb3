//! Established-Connection Table
//!
//! Enumerates established inet-family TCP endpoints system-wide and
//! attributes them to owning processes. Linux reads the /proc/net tables and
//! maps socket inodes to pids through /proc/<pid>/fd; Windows parses
//! `netstat -ano`. Inaccessible processes are skipped, never fatal.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One established connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub protocol: String,
    pub local_addr: String,
    pub remote_addr: String,
    pub state: String,
    /// Owning process, when attributable.
    pub pid: Option<u32>,
}

/// TCP state code for ESTABLISHED in the /proc/net tables.
const TCP_ESTABLISHED: u8 = 0x01;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Snapshot of all established TCP connections.
pub fn established() -> Vec<ConnectionEntry> {
    #[cfg(target_os = "linux")]
    {
        linux_established()
    }

    #[cfg(windows)]
    {
        windows_established()
    }

    #[cfg(not(any(target_os = "linux", windows)))]
    {
        log::debug!("connection enumeration not supported on this platform");
        Vec::new()
    }
}

/// Established-connection count per owning pid.
pub fn connection_counts() -> HashMap<u32, usize> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for entry in established() {
        if let Some(pid) = entry.pid {
            *counts.entry(pid).or_insert(0) += 1;
        }
    }
    counts
}

// ============================================================================
// /proc/net PARSING
// ============================================================================

/// Parsed row of a /proc/net/tcp{,6} table.
#[derive(Debug, Clone)]
pub(crate) struct ProcNetSocket {
    pub local: String,
    pub remote: String,
    pub state: u8,
    pub inode: u64,
}

/// Parse one data row. Header rows and malformed lines return None.
pub(crate) fn parse_proc_net_line(line: &str) -> Option<ProcNetSocket> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 10 {
        return None;
    }
    // Data rows start with a "<slot>:" index; the header row does not
    if !fields[0].ends_with(':') {
        return None;
    }

    Some(ProcNetSocket {
        local: decode_proc_net_addr(fields[1])?,
        remote: decode_proc_net_addr(fields[2])?,
        state: u8::from_str_radix(fields[3], 16).ok()?,
        inode: fields[9].parse().ok()?,
    })
}

/// Decode a kernel-formatted "ADDR:PORT" endpoint. Addresses are hex u32
/// words in host byte order; the port is plain big-endian hex.
pub(crate) fn decode_proc_net_addr(raw: &str) -> Option<String> {
    let (addr_hex, port_hex) = raw.split_once(':')?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;

    match addr_hex.len() {
        8 => {
            let word = u32::from_str_radix(addr_hex, 16).ok()?;
            let b = word.to_le_bytes();
            Some(format!("{}:{}", Ipv4Addr::new(b[0], b[1], b[2], b[3]), port))
        }
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in addr_hex.as_bytes().chunks(8).enumerate() {
                let chunk = std::str::from_utf8(chunk).ok()?;
                let word = u32::from_str_radix(chunk, 16).ok()?;
                bytes[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
            }
            Some(format!("[{}]:{}", Ipv6Addr::from(bytes), port))
        }
        _ => None,
    }
}

/// Extract the inode from a "socket:[N]" fd symlink target.
pub(crate) fn parse_socket_inode(link: &str) -> Option<u64> {
    link.strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

#[cfg(target_os = "linux")]
fn linux_established() -> Vec<ConnectionEntry> {
    let owners = socket_inode_owners();
    let mut entries = Vec::new();

    for (path, proto) in [("/proc/net/tcp", "tcp"), ("/proc/net/tcp6", "tcp6")] {
        let table = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                log::debug!("cannot read {}: {}", path, e);
                continue;
            }
        };

        for line in table.lines().skip(1) {
            let Some(sock) = parse_proc_net_line(line) else {
                continue;
            };
            if sock.state != TCP_ESTABLISHED {
                continue;
            }
            entries.push(ConnectionEntry {
                protocol: proto.to_string(),
                local_addr: sock.local,
                remote_addr: sock.remote,
                state: "ESTABLISHED".to_string(),
                pid: owners.get(&sock.inode).copied(),
            });
        }
    }

    entries
}

/// Map socket inodes to owning pids by walking /proc/<pid>/fd. Processes
/// whose fd table is unreadable (gone or permission denied) are skipped.
#[cfg(target_os = "linux")]
fn socket_inode_owners() -> HashMap<u64, u32> {
    let mut owners = HashMap::new();

    let proc_dir = match std::fs::read_dir("/proc") {
        Ok(d) => d,
        Err(_) => return owners,
    };

    for entry in proc_dir.flatten() {
        let pid = match entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) {
            Some(pid) => pid,
            None => continue,
        };

        let fds = match std::fs::read_dir(entry.path().join("fd")) {
            Ok(fds) => fds,
            Err(_) => continue,
        };

        for fd in fds.flatten() {
            if let Ok(target) = std::fs::read_link(fd.path()) {
                if let Some(inode) = parse_socket_inode(&target.to_string_lossy()) {
                    owners.insert(inode, pid);
                }
            }
        }
    }

    owners
}

// ============================================================================
// NETSTAT PARSING
// ============================================================================

/// Parse one `netstat -ano` row, keeping only established TCP entries.
pub(crate) fn parse_netstat_line(line: &str) -> Option<ConnectionEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return None;
    }
    if !fields[0].eq_ignore_ascii_case("tcp") {
        return None;
    }
    if !fields[3].eq_ignore_ascii_case("established") {
        return None;
    }

    Some(ConnectionEntry {
        protocol: "tcp".to_string(),
        local_addr: fields[1].to_string(),
        remote_addr: fields[2].to_string(),
        state: "ESTABLISHED".to_string(),
        pid: fields[4].parse().ok(),
    })
}

#[cfg(windows)]
fn windows_established() -> Vec<ConnectionEntry> {
    let output = match std::process::Command::new("netstat").arg("-ano").output() {
        Ok(out) => out,
        Err(e) => {
            log::debug!("netstat failed: {}", e);
            return Vec::new();
        }
    };

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(parse_netstat_line)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
