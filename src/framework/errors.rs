// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Well-known framework error messages.
//!
//! Decoded errors carrying one of these messages share the registered instance.

pub const ERR_INCORRECT: &str = "incorrect value or arguments";
pub const ERR_TIMEOUT: &str = "timed out";
pub const ERR_UNSUPPORTED: &str = "not supported";
pub const ERR_UNKNOWN: &str = "unknown";
pub const ERR_NAME_UNKNOWN: &str = "unknown name";
pub const ERR_NOT_ALLOWED: &str = "not allowed";
pub const ERR_PROCESS_UNKNOWN: &str = "unknown process";
pub const ERR_PROCESS_TERMINATED: &str = "process terminated";
pub const ERR_META_UNKNOWN: &str = "unknown meta process";
pub const ERR_APPLICATION_UNKNOWN: &str = "unknown application";
pub const ERR_TAKEN: &str = "resource is taken";

pub const TERMINATE_REASON_NORMAL: &str = "normal";
pub const TERMINATE_REASON_SHUTDOWN: &str = "shutdown";
pub const TERMINATE_REASON_KILL: &str = "kill";
pub const TERMINATE_REASON_PANIC: &str = "panic";

/// Every message registered at startup, in registration order.
pub const FRAMEWORK_ERRORS: &[&str] = &[
    ERR_INCORRECT,
    ERR_TIMEOUT,
    ERR_UNSUPPORTED,
    ERR_UNKNOWN,
    ERR_NAME_UNKNOWN,
    ERR_NOT_ALLOWED,
    ERR_PROCESS_UNKNOWN,
    ERR_PROCESS_TERMINATED,
    ERR_META_UNKNOWN,
    ERR_APPLICATION_UNKNOWN,
    ERR_TAKEN,
    TERMINATE_REASON_NORMAL,
    TERMINATE_REASON_SHUTDOWN,
    TERMINATE_REASON_KILL,
    TERMINATE_REASON_PANIC,
];
