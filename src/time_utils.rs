// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and id generation.

use chrono::{DateTime, SecondsFormat, Utc};
use ring::rand::{SecureRandom, SystemRandom};

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z`
/// suffix, the same shape browsers produce with `toISOString()`.
///
/// Fixed width keeps lexical order equal to chronological order, which the
/// `date_added DESC` listings rely on.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time formatted with [`format_utc_rfc3339`].
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Generate an opaque record id: base36 milliseconds followed by a base36
/// random suffix.
pub fn generate_id() -> String {
    generate_id_at(Utc::now())
}

fn generate_id_at(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();

    let mut bytes = [0u8; 8];
    // SystemRandom only fails when the OS RNG is unavailable; the clock
    // prefix still keeps ids distinct across milliseconds in that case.
    if SystemRandom::new().fill(&mut bytes).is_err() {
        tracing::warn!("System RNG unavailable, id suffix will be zero");
    }
    let suffix = u64::from_le_bytes(bytes);

    format!("{}{}", to_base36(millis), to_base36(suffix))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
