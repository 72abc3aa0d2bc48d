// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

#[cfg(target_os = "linux")]
pub mod posix;

// Re-export the platform-specific implementation under a uniform name.

#[cfg(target_os = "linux")]
pub use posix::PlatformMq;
