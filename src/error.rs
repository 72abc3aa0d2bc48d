// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Domain errors and errno translation for queue operations.

use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MqError>;

/// Which blocking operation ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Send,
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Send => f.write_str("send"),
            Direction::Receive => f.write_str("receive"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MqError {
    #[error("failed to open message queue {name:?}: {source}")]
    Open { name: String, source: io::Error },

    #[error("failed to close message queue: {0}")]
    Close(io::Error),

    #[error("failed to unlink message queue {name:?}: {source}")]
    Unlink { name: String, source: io::Error },

    #[error("message is empty")]
    EmptyMessage,

    #[error("message of {len} bytes exceeds the queue maximum of {max} bytes")]
    MessageTooLarge { len: usize, max: i64 },

    #[error("message queue is full")]
    QueueFull,

    #[error("message queue is empty")]
    QueueEmpty,

    #[error("message queue descriptor is not valid")]
    QueueInvalid,

    #[error("{0} deadline elapsed")]
    Timeout(Direction),

    #[error(transparent)]
    Os(io::Error),
}

impl MqError {
    /// The errno behind this error, if it came from the kernel.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            MqError::Open { source, .. } | MqError::Unlink { source, .. } => source.raw_os_error(),
            MqError::Close(e) | MqError::Os(e) => e.raw_os_error(),
            _ => None,
        }
    }

    /// Queue was full, either observed immediately or for the whole wait.
    pub fn is_full(&self) -> bool {
        matches!(self, MqError::QueueFull | MqError::Timeout(Direction::Send))
    }

    /// Queue was empty, either observed immediately or for the whole wait.
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            MqError::QueueEmpty | MqError::Timeout(Direction::Receive)
        )
    }

    /// Transient queue state; retrying later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.is_full() || self.is_empty()
    }
}

/// Translate a failed `mq_send` / `mq_timedsend`.
pub(crate) fn send_error(err: io::Error, len: usize, max: i64) -> MqError {
    match err.raw_os_error() {
        Some(libc::EBADF) => MqError::QueueInvalid,
        Some(libc::EMSGSIZE) => MqError::MessageTooLarge { len, max },
        Some(libc::EAGAIN) => MqError::QueueFull,
        Some(libc::ETIMEDOUT) => MqError::Timeout(Direction::Send),
        _ => MqError::Os(err),
    }
}

/// Translate a failed `mq_receive` / `mq_timedreceive`.
///
/// `EMSGSIZE` cannot happen with a buffer sized from the queue's own
/// attributes; if it does it is passed through as `Os`.
pub(crate) fn receive_error(err: io::Error) -> MqError {
    match err.raw_os_error() {
        Some(libc::EBADF) => MqError::QueueInvalid,
        Some(libc::EAGAIN) => MqError::QueueEmpty,
        Some(libc::ETIMEDOUT) => MqError::Timeout(Direction::Receive),
        _ => MqError::Os(err),
    }
}

/// Translate a failed descriptor-only call (`mq_getattr`, `mq_setattr`).
pub(crate) fn descriptor_error(err: io::Error) -> MqError {
    match err.raw_os_error() {
        Some(libc::EBADF) => MqError::QueueInvalid,
        _ => MqError::Os(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(code: i32) -> io::Error {
        io::Error::from_raw_os_error(code)
    }

    #[test]
    fn send_errno_mapping() {
        assert!(matches!(send_error(os(libc::EBADF), 1, 8), MqError::QueueInvalid));
        assert!(matches!(
            send_error(os(libc::EMSGSIZE), 13, 10),
            MqError::MessageTooLarge { len: 13, max: 10 }
        ));
        assert!(matches!(send_error(os(libc::EAGAIN), 1, 8), MqError::QueueFull));
        assert!(matches!(
            send_error(os(libc::ETIMEDOUT), 1, 8),
            MqError::Timeout(Direction::Send)
        ));
    }

    #[test]
    fn receive_errno_mapping() {
        assert!(matches!(receive_error(os(libc::EBADF)), MqError::QueueInvalid));
        assert!(matches!(receive_error(os(libc::EAGAIN)), MqError::QueueEmpty));
        assert!(matches!(
            receive_error(os(libc::ETIMEDOUT)),
            MqError::Timeout(Direction::Receive)
        ));
    }

    #[test]
    fn unmapped_errno_passes_through() {
        let err = send_error(os(libc::EINVAL), 1, 8);
        assert!(matches!(err, MqError::Os(_)));
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));

        let err = receive_error(os(libc::EMSGSIZE));
        assert!(matches!(err, MqError::Os(_)));
        assert_eq!(err.raw_os_error(), Some(libc::EMSGSIZE));
    }

    #[test]
    fn full_and_empty_predicates_cover_timeouts() {
        assert!(MqError::QueueFull.is_full());
        assert!(MqError::Timeout(Direction::Send).is_full());
        assert!(!MqError::Timeout(Direction::Send).is_empty());
        assert!(MqError::QueueEmpty.is_empty());
        assert!(MqError::Timeout(Direction::Receive).is_empty());
        assert!(MqError::QueueEmpty.is_retryable());
        assert!(!MqError::QueueInvalid.is_retryable());
        assert!(!MqError::EmptyMessage.is_retryable());
    }

    #[test]
    fn lifecycle_errors_keep_errno() {
        let err = MqError::Open {
            name: "/q".into(),
            source: os(libc::ENOENT),
        };
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
        assert!(err.to_string().contains("/q"));
        assert_eq!(MqError::Close(os(libc::EBADF)).raw_os_error(), Some(libc::EBADF));
    }
}
