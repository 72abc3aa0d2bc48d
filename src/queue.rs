// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named POSIX message queue handle.
// Delegates to platform::PlatformMq and translates errno into MqError.

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use crate::error::{self, MqError, Result};
use crate::mq_name;
use crate::platform::posix::abs_deadline;
use crate::platform::PlatformMq;
use crate::{OpenFlags, QueueAttributes, DEFAULT_MODE};

/// An open reference to a kernel-managed, priority-ordered message queue.
///
/// Any number of handles, in this process or others, may attach to the same
/// name. Each handle owns its descriptor exclusively: it is released by
/// [`close`](Self::close) or on drop. Closing never removes the queue; use
/// [`unlink`](Self::unlink) for that.
///
/// Send and receive take `&self` and may run concurrently from several
/// threads; the kernel serialises access to the queue.
#[derive(Debug)]
pub struct MessageQueue {
    inner: Option<PlatformMq>,
    name: String,
    attributes: QueueAttributes,
}

impl MessageQueue {
    /// Create or attach to the queue `name`, with [`DEFAULT_MODE`] permissions.
    ///
    /// The capacity in `attributes` only applies when `flags` contains
    /// [`OpenFlags::CREATE`] and the queue does not exist yet. The handle
    /// records the attributes the kernel reports after the open.
    pub fn open(name: &str, flags: OpenFlags, attributes: QueueAttributes) -> Result<Self> {
        Self::open_with_mode(name, flags, attributes, DEFAULT_MODE)
    }

    /// Like [`open`](Self::open) with explicit permission bits for a newly
    /// created queue.
    pub fn open_with_mode(
        name: &str,
        flags: OpenFlags,
        attributes: QueueAttributes,
        mode: u32,
    ) -> Result<Self> {
        let open_err = |source| MqError::Open {
            name: name.to_string(),
            source,
        };

        let c_name = mq_name::to_c_name(name).map_err(open_err)?;
        let inner = PlatformMq::open(&c_name, flags.bits(), mode as libc::mode_t, &attributes)
            .map_err(open_err)?;
        let attributes = inner.getattr().map_err(open_err)?;

        tracing::debug!(
            name,
            mqd = inner.raw(),
            max_messages = attributes.max_messages,
            max_message_size = attributes.max_message_size,
            "opened message queue"
        );

        Ok(Self {
            inner: Some(inner),
            name: name.to_string(),
            attributes,
        })
    }

    /// Release the descriptor. The handle is unusable afterwards: send and
    /// receive report [`MqError::QueueInvalid`], and a second close reports
    /// `EBADF` without touching the kernel.
    pub fn close(&mut self) -> Result<()> {
        let inner = self
            .inner
            .take()
            .ok_or_else(|| MqError::Close(io::Error::from_raw_os_error(libc::EBADF)))?;
        let mqd = inner.raw();
        inner.close().map_err(MqError::Close)?;
        tracing::debug!(name = %self.name, mqd, "closed message queue");
        Ok(())
    }

    /// Remove this queue's name from the system. Open descriptors, including
    /// this one, keep working until closed.
    pub fn unlink(&self) -> Result<()> {
        Self::unlink_by_name(&self.name)
    }

    /// Remove a named queue without needing a handle.
    pub fn unlink_by_name(name: &str) -> Result<()> {
        let unlink_err = |source| MqError::Unlink {
            name: name.to_string(),
            source,
        };
        let c_name = mq_name::to_c_name(name).map_err(unlink_err)?;
        PlatformMq::unlink(&c_name).map_err(unlink_err)?;
        tracing::debug!(name, "unlinked message queue");
        Ok(())
    }

    /// Enqueue `msg` at `priority`. Higher priorities are received first;
    /// equal priorities keep arrival order.
    ///
    /// With `timeout` set, waits at most that long for room and then fails
    /// with [`MqError::Timeout`]. Without it, waits indefinitely unless the
    /// handle is non-blocking, in which case a full queue is reported
    /// immediately as [`MqError::QueueFull`]. Signal interruptions are
    /// retried against the same deadline.
    pub fn send(&self, msg: &[u8], priority: u32, timeout: Option<Duration>) -> Result<()> {
        if msg.is_empty() {
            return Err(MqError::EmptyMessage);
        }
        let inner = self.inner.as_ref().ok_or(MqError::QueueInvalid)?;
        let deadline = timeout.map(abs_deadline);
        inner
            .send(msg, priority, deadline.as_ref())
            .map_err(|e| error::send_error(e, msg.len(), self.attributes.max_message_size))
    }

    /// Dequeue the oldest message of the highest priority, returning its
    /// bytes and priority.
    ///
    /// Blocking and timeout behave as in [`send`](Self::send), with
    /// [`MqError::QueueEmpty`] for a non-blocking empty queue.
    pub fn receive(&self, timeout: Option<Duration>) -> Result<(Vec<u8>, u32)> {
        let inner = self.inner.as_ref().ok_or(MqError::QueueInvalid)?;
        let mut buf = vec![0u8; self.receive_buffer_len()];
        let deadline = timeout.map(abs_deadline);
        let (len, priority) = inner
            .receive(&mut buf, deadline.as_ref())
            .map_err(error::receive_error)?;
        buf.truncate(len);
        Ok((buf, priority))
    }

    /// Switch the open description between blocking and non-blocking mode.
    pub fn set_nonblocking(&mut self, nonblocking: bool) -> Result<()> {
        let inner = self.inner.as_ref().ok_or(MqError::QueueInvalid)?;
        let mut wanted = self.attributes;
        if nonblocking {
            wanted.flags |= libc::O_NONBLOCK as i64;
        } else {
            wanted.flags &= !(libc::O_NONBLOCK as i64);
        }
        let now = inner.setattr(&wanted).map_err(error::descriptor_error)?;
        self.attributes.flags = now.flags;
        Ok(())
    }

    /// A fresh attribute snapshot from the kernel. Informational only: the
    /// message count may change before the caller looks at it.
    pub fn fetch_attributes(&self) -> Result<QueueAttributes> {
        let inner = self.inner.as_ref().ok_or(MqError::QueueInvalid)?;
        inner.getattr().map_err(error::descriptor_error)
    }

    /// Attributes recorded at open time.
    pub fn attributes(&self) -> &QueueAttributes {
        &self.attributes
    }

    /// The name this handle was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// The raw descriptor, for use with `poll`/`epoll`. `None` after close.
    pub fn raw_fd(&self) -> Option<RawFd> {
        self.inner.as_ref().map(PlatformMq::raw)
    }

    fn receive_buffer_len(&self) -> usize {
        usize::try_from(self.attributes.max_message_size).unwrap_or(0)
    }
}
