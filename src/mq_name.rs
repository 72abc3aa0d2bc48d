// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Queue name normalisation. The kernel wants "/name" with no further
// slashes and a body no longer than NAME_MAX.

use std::ffi::CString;
use std::io;

/// FNV-1a 64-bit hash, used to shorten over-long queue names.
pub fn fnv1a_64(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in data {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Maximum length of a queue name body (excluding the leading '/').
/// Linux rejects longer names with `ENAMETOOLONG`.
pub const MQ_NAME_MAX: usize = 255;

// 1 (underscore) + 16 (hex hash)
const HASH_SUFFIX_LEN: usize = 1 + 16;

/// Produce the kernel form of a queue name (with leading '/').
///
/// Bodies longer than [`MQ_NAME_MAX`] are shortened to
///     `/<prefix>_<16-hex-FNV-1a-hash>`
/// so that every process attaching by the same long name lands on the
/// same queue.
pub fn make_mq_name(name: &str) -> String {
    let result = if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    };

    if result.len() - 1 <= MQ_NAME_MAX {
        return result;
    }

    let hash = fnv1a_64(result.as_bytes());

    let mut take = MQ_NAME_MAX - HASH_SUFFIX_LEN;
    let body = &result[1..];
    while !body.is_char_boundary(take) {
        take -= 1;
    }

    format!("/{}_{hash:016x}", &body[..take])
}

/// Kernel name as a C string. Embedded NUL bytes are an `InvalidInput` error.
pub fn to_c_name(name: &str) -> io::Result<CString> {
    CString::new(make_mq_name(name)).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}
