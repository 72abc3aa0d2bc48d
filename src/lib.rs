// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Typed access to named POSIX message queues: open/close/unlink lifecycle,
// priority-ordered send and receive with optional deadlines, and errno
// translation into a small set of domain errors.

#[cfg(not(target_os = "linux"))]
compile_error!("posixmq requires a Linux target (mq_open(3) with integer descriptors)");

pub mod mq_name;

mod platform;

mod attr;
pub use attr::{
    OpenFlags, QueueAttributes, DEFAULT_MAX_MESSAGES, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_MODE,
};

mod error;
pub use error::{Direction, MqError, Result};

mod queue;
pub use queue::MessageQueue;
