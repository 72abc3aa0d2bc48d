// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX implementation of named message queues.
// Thin wrappers over mq_open(3), mq_timedsend(3), mq_timedreceive(3) and
// friends. Everything here speaks io::Error; the domain mapping lives in
// crate::error.

use std::ffi::CStr;
use std::io;
use std::ptr;
use std::time::Duration;

use crate::QueueAttributes;

// ---------------------------------------------------------------------------
// Interrupt retry and deadlines
// ---------------------------------------------------------------------------

/// Re-issue `call` while it fails with `EINTR`.
///
/// `call` returns the raw syscall result; `-1` means failure with the reason
/// in errno. The closure captures its deadline by reference, so every retry
/// waits against the same absolute point in time.
pub(crate) fn retry_eintr<F>(mut call: F) -> io::Result<isize>
where
    F: FnMut() -> isize,
{
    loop {
        let ret = call();
        if ret != -1 {
            return Ok(ret);
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::EINTR) {
            return Err(err);
        }
        tracing::trace!("message queue call interrupted, retrying");
    }
}

/// Absolute `CLOCK_REALTIME` deadline `timeout` from now.
///
/// Saturates instead of overflowing `time_t` for huge timeouts.
pub(crate) fn abs_deadline(timeout: Duration) -> libc::timespec {
    let mut now: libc::timespec = unsafe { std::mem::zeroed() };
    unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut now) };
    deadline_after(now, timeout)
}

fn deadline_after(now: libc::timespec, timeout: Duration) -> libc::timespec {
    let ns_total = now.tv_nsec as u64 + timeout.subsec_nanos() as u64;
    let extra_secs =
        libc::time_t::try_from(timeout.as_secs().saturating_add(ns_total / 1_000_000_000))
            .unwrap_or(libc::time_t::MAX);
    match now.tv_sec.checked_add(extra_secs) {
        Some(tv_sec) => libc::timespec {
            tv_sec,
            tv_nsec: (ns_total % 1_000_000_000) as libc::c_long,
        },
        None => libc::timespec {
            tv_sec: libc::time_t::MAX,
            tv_nsec: 999_999_999,
        },
    }
}

// ---------------------------------------------------------------------------
// PlatformMq — owned mqd_t
// ---------------------------------------------------------------------------

/// An open message queue descriptor. Closed on drop.
#[derive(Debug)]
pub struct PlatformMq {
    mqd: libc::mqd_t,
}

impl PlatformMq {
    /// `mq_open`. `attr` is passed to the kernel only when `oflag` contains
    /// `O_CREAT`. Not retried on `EINTR`.
    pub fn open(
        name: &CStr,
        oflag: libc::c_int,
        mode: libc::mode_t,
        attr: &QueueAttributes,
    ) -> io::Result<Self> {
        let mut raw_attr = attr.to_raw();
        let attr_ptr: *mut libc::mq_attr = if oflag & libc::O_CREAT != 0 {
            &mut raw_attr
        } else {
            ptr::null_mut()
        };

        let mqd = unsafe { libc::mq_open(name.as_ptr(), oflag, mode as libc::c_uint, attr_ptr) };
        if mqd == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { mqd })
    }

    /// `mq_close`. Consumes the descriptor whether or not the kernel reports
    /// an error.
    pub fn close(self) -> io::Result<()> {
        let mqd = self.mqd;
        std::mem::forget(self);
        if unsafe { libc::mq_close(mqd) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// `mq_unlink`. Works on the name only; no descriptor is needed.
    pub fn unlink(name: &CStr) -> io::Result<()> {
        if unsafe { libc::mq_unlink(name.as_ptr()) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn raw(&self) -> libc::mqd_t {
        self.mqd
    }

    /// `mq_getattr`.
    pub fn getattr(&self) -> io::Result<QueueAttributes> {
        let mut raw: libc::mq_attr = unsafe { std::mem::zeroed() };
        if unsafe { libc::mq_getattr(self.mqd, &mut raw) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(QueueAttributes::from_raw(&raw))
    }

    /// `mq_setattr`. Only `flags` is honoured by the kernel; returns the
    /// attributes in effect after the change.
    pub fn setattr(&self, attr: &QueueAttributes) -> io::Result<QueueAttributes> {
        let raw = attr.to_raw();
        if unsafe { libc::mq_setattr(self.mqd, &raw, ptr::null_mut()) } == -1 {
            return Err(io::Error::last_os_error());
        }
        self.getattr()
    }

    /// `mq_send`, or `mq_timedsend` when a deadline is given.
    pub fn send(
        &self,
        msg: &[u8],
        priority: u32,
        deadline: Option<&libc::timespec>,
    ) -> io::Result<()> {
        let msg_ptr = msg.as_ptr() as *const libc::c_char;
        retry_eintr(|| {
            let ret = match deadline {
                Some(ts) => unsafe {
                    libc::mq_timedsend(self.mqd, msg_ptr, msg.len(), priority, ts)
                },
                None => unsafe { libc::mq_send(self.mqd, msg_ptr, msg.len(), priority) },
            };
            ret as isize
        })?;
        Ok(())
    }

    /// `mq_receive`, or `mq_timedreceive` when a deadline is given.
    /// Returns the message length written into `buf` and its priority.
    pub fn receive(
        &self,
        buf: &mut [u8],
        deadline: Option<&libc::timespec>,
    ) -> io::Result<(usize, u32)> {
        let buf_ptr = buf.as_mut_ptr() as *mut libc::c_char;
        let buf_len = buf.len();
        let mut priority: libc::c_uint = 0;
        let n = retry_eintr(|| {
            let ret = match deadline {
                Some(ts) => unsafe {
                    libc::mq_timedreceive(self.mqd, buf_ptr, buf_len, &mut priority, ts)
                },
                None => unsafe { libc::mq_receive(self.mqd, buf_ptr, buf_len, &mut priority) },
            };
            ret as isize
        })?;
        Ok((n as usize, priority))
    }
}

impl Drop for PlatformMq {
    fn drop(&mut self) {
        unsafe { libc::mq_close(self.mqd) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_errno(code: i32) {
        unsafe { *libc::__errno_location() = code };
    }

    #[test]
    fn retry_eintr_reissues_interrupted_calls() {
        let mut calls = 0;
        let ret = retry_eintr(|| {
            calls += 1;
            if calls < 3 {
                set_errno(libc::EINTR);
                -1
            } else {
                7
            }
        })
        .expect("retry");
        assert_eq!(ret, 7);
        assert_eq!(calls, 3);
    }

    #[test]
    fn retry_eintr_surfaces_other_errors() {
        let mut calls = 0;
        let err = retry_eintr(|| {
            calls += 1;
            set_errno(libc::EAGAIN);
            -1
        })
        .unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EAGAIN));
        assert_eq!(calls, 1);
    }

    #[test]
    fn deadline_carries_nanoseconds() {
        let now = libc::timespec {
            tv_sec: 100,
            tv_nsec: 900_000_000,
        };
        let ts = deadline_after(now, Duration::from_millis(250));
        assert_eq!(ts.tv_sec, 101);
        assert_eq!(ts.tv_nsec, 150_000_000);
    }

    #[test]
    fn deadline_saturates() {
        let now = libc::timespec {
            tv_sec: 100,
            tv_nsec: 0,
        };
        let ts = deadline_after(now, Duration::MAX);
        assert_eq!(ts.tv_sec, libc::time_t::MAX);
    }

    #[test]
    fn abs_deadline_is_in_the_future() {
        let before = abs_deadline(Duration::ZERO);
        let after = abs_deadline(Duration::from_secs(5));
        assert!(after.tv_sec >= before.tv_sec + 4);
    }
}
