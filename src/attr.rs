// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Open-mode flags, capacity attributes and the recommended defaults.

use bitflags::bitflags;

/// Permission bits used when a queue is created (rw-r--r--).
pub const DEFAULT_MODE: u32 = 0o644;

/// Recommended maximum queue depth. Matches the Linux `msg_default`.
pub const DEFAULT_MAX_MESSAGES: i64 = 10;

/// Recommended maximum message size in bytes. Matches the Linux `msgsize_default`.
pub const DEFAULT_MAX_MESSAGE_SIZE: i64 = 8192;

bitflags! {
    /// Open-mode bits, using the platform's native `O_*` encoding.
    ///
    /// Values are handed to `mq_open` unmodified. `READ_ONLY` is zero on
    /// every POSIX platform, so it is the implied access mode when neither
    /// `WRITE_ONLY` nor `READ_WRITE` is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: libc::c_int {
        const READ_ONLY = libc::O_RDONLY;
        const WRITE_ONLY = libc::O_WRONLY;
        const READ_WRITE = libc::O_RDWR;
        /// Create the queue if it does not exist.
        const CREATE = libc::O_CREAT;
        /// With `CREATE`, fail if the queue already exists.
        const EXCLUSIVE = libc::O_EXCL;
        /// Report fullness / emptiness immediately instead of blocking.
        const NONBLOCK = libc::O_NONBLOCK;

        const _ = !0;
    }
}

/// Capacity attributes of a queue.
///
/// On open, `max_messages` and `max_message_size` are only consulted when
/// the call creates the queue. The values recorded on a handle are read back
/// from the kernel once, right after open.
///
/// `current_messages` is a snapshot taken at that moment and is never
/// refreshed. Do not use it to decide whether a send or receive will succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAttributes {
    pub flags: i64,
    pub max_messages: i64,
    pub max_message_size: i64,
    pub current_messages: i64,
}

impl QueueAttributes {
    /// Attributes with the given capacity and no flags.
    pub const fn new(max_messages: i64, max_message_size: i64) -> Self {
        Self {
            flags: 0,
            max_messages,
            max_message_size,
            current_messages: 0,
        }
    }

    /// Whether the recorded flags include `O_NONBLOCK`.
    pub fn is_nonblocking(&self) -> bool {
        self.flags & libc::O_NONBLOCK as i64 != 0
    }

    pub(crate) fn to_raw(self) -> libc::mq_attr {
        // mq_attr carries private padding on Linux; start from zeroed storage.
        let mut raw: libc::mq_attr = unsafe { std::mem::zeroed() };
        raw.mq_flags = self.flags as libc::c_long;
        raw.mq_maxmsg = self.max_messages as libc::c_long;
        raw.mq_msgsize = self.max_message_size as libc::c_long;
        raw.mq_curmsgs = self.current_messages as libc::c_long;
        raw
    }

    pub(crate) fn from_raw(raw: &libc::mq_attr) -> Self {
        Self {
            flags: raw.mq_flags as i64,
            max_messages: raw.mq_maxmsg as i64,
            max_message_size: raw.mq_msgsize as i64,
            current_messages: raw.mq_curmsgs as i64,
        }
    }
}

impl Default for QueueAttributes {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES, DEFAULT_MAX_MESSAGE_SIZE)
    }
}
