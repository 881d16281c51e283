//! Notification texts
//!
//! Kept as pure functions so the exact wording is tested in one place.

use chrono::{NaiveDate, NaiveTime};

use crate::schedule::format_time;

pub fn drive_scheduled(drive_id: i64, driver: &str, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "SCHEDULED>> Drive {} by Driver {} on {} at {}",
        drive_id,
        driver,
        date,
        format_time(time)
    )
}

pub fn drive_cancelled(drive_id: i64, driver: &str, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "CANCELLED>> Drive {} by Driver {} on {} at {}",
        drive_id,
        driver,
        date,
        format_time(time)
    )
}

pub fn stop_requested(drive_id: i64, street: &str, area: &str, time: NaiveTime) -> String {
    format!(
        "You requested a stop on drive #{} to {}, {} at {}.",
        drive_id,
        street,
        area,
        format_time(time)
    )
}

pub fn stop_approved(drive_id: i64, eta: Option<&str>, status: Option<&str>) -> String {
    format!(
        "APPROVED>> Your stop request for drive {} has been approved. ETA: {}, Status: {}",
        drive_id,
        eta.unwrap_or("N/A"),
        status.unwrap_or("Subscribed")
    )
}

pub fn stop_rejected(drive_id: i64, reason: Option<&str>) -> String {
    let reason = reason.map(|r| format!(" Reason: {}", r)).unwrap_or_default();
    format!(
        "REJECTED>> Your stop request for drive {} was rejected.{}",
        drive_id, reason
    )
}

/// Sent to the driver when a resident withdraws a request
pub fn stop_cancelled_for_driver(
    resident: &str,
    drive_id: i64,
    street: &str,
    area: &str,
    time: NaiveTime,
) -> String {
    format!(
        "Resident {} cancelled their stop request for drive #{} to {}, {} at {}.",
        resident,
        drive_id,
        street,
        area,
        format_time(time)
    )
}

/// Confirmation sent to the resident who withdrew
pub fn stop_cancelled_for_resident(drive_id: i64, street: &str, area: &str, time: NaiveTime) -> String {
    format!(
        "You cancelled your stop request for drive #{} to {}, {} at {}.",
        drive_id,
        street,
        area,
        format_time(time)
    )
}

/// Free-form ETA/status update; at least one part is expected
pub fn stop_update(
    drive_id: i64,
    street: &str,
    area: &str,
    eta: Option<&str>,
    status: Option<&str>,
) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(eta) = eta {
        parts.push(format!("ETA: {}", eta));
    }
    if let Some(status) = status {
        parts.push(format!("Status: {}", status));
    }
    format!(
        "Update for drive #{} to {}, {}: {}",
        drive_id,
        street,
        area,
        parts.join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 26).unwrap()
    }

    fn ten() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_drive_messages() {
        assert_eq!(
            drive_scheduled(3, "mary", date(), ten()),
            "SCHEDULED>> Drive 3 by Driver mary on 2025-10-26 at 10:00"
        );
        assert_eq!(
            drive_cancelled(3, "mary", date(), ten()),
            "CANCELLED>> Drive 3 by Driver mary on 2025-10-26 at 10:00"
        );
    }

    #[test]
    fn test_stop_requested() {
        assert_eq!(
            stop_requested(1, "Warner Street", "St. Augustine", ten()),
            "You requested a stop on drive #1 to Warner Street, St. Augustine at 10:00."
        );
    }

    #[test]
    fn test_stop_approved_defaults() {
        assert_eq!(
            stop_approved(4, None, None),
            "APPROVED>> Your stop request for drive 4 has been approved. ETA: N/A, Status: Subscribed"
        );
        assert_eq!(
            stop_approved(4, Some("10:15"), Some("On the way")),
            "APPROVED>> Your stop request for drive 4 has been approved. ETA: 10:15, Status: On the way"
        );
    }

    #[test]
    fn test_stop_rejected_reason_is_optional() {
        assert_eq!(
            stop_rejected(4, None),
            "REJECTED>> Your stop request for drive 4 was rejected."
        );
        assert_eq!(
            stop_rejected(4, Some("Sold out")),
            "REJECTED>> Your stop request for drive 4 was rejected. Reason: Sold out"
        );
    }

    #[test]
    fn test_stop_update_parts() {
        assert_eq!(
            stop_update(2, "Fairly Street", "Tunapuna", Some("5 mins"), None),
            "Update for drive #2 to Fairly Street, Tunapuna: ETA: 5 mins"
        );
        assert_eq!(
            stop_update(2, "Fairly Street", "Tunapuna", Some("5 mins"), Some("Near")),
            "Update for drive #2 to Fairly Street, Tunapuna: ETA: 5 mins | Status: Near"
        );
    }
}
