use chrono::{DateTime, FixedOffset, Utc};
use core_types::{Account, Checkin, CheckinHit, CoreSettings, Failure, Hit, Message, Monitor};

/// Converts a stored UTC timestamp to the configured display timezone,
/// expressed as an offset in hours (fractional offsets such as +5.5 are
/// valid). Total over valid timestamps; an offset of 0.0 is the identity.
pub fn timezoner(value: DateTime<Utc>, offset_hours: f32) -> DateTime<FixedOffset> {
    let seconds = (offset_hours * 3600.0).round() as i32;
    let offset = FixedOffset::east_opt(seconds)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is always valid"));
    value.with_timezone(&offset)
}

/// Post-fetch hook converting every timezone-sensitive timestamp field of an
/// entity from stored UTC to the configured display timezone. Each
/// implementation names exactly the fields it converts. Read-path only:
/// stored values remain UTC always.
pub trait Localize {
    fn localize(&mut self, offset_hours: f32);
}

impl Localize for CoreSettings {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
        self.updated_at = timezoner(self.updated_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for Monitor {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
        self.updated_at = timezoner(self.updated_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for Account {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
        self.updated_at = timezoner(self.updated_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for Hit {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for Failure {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for Checkin {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
        self.updated_at = timezoner(self.updated_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for CheckinHit {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
    }
}

impl Localize for Message {
    fn localize(&mut self, offset_hours: f32) {
        self.created_at = timezoner(self.created_at.with_timezone(&Utc), offset_hours);
        self.updated_at = timezoner(self.updated_at.with_timezone(&Utc), offset_hours);
        // The announcement window boundaries may carry a stray zone
        // annotation from older writers; re-anchor each to UTC first.
        self.start_on = timezoner(self.start_on.with_timezone(&Utc), offset_hours);
        self.end_on = timezoner(self.end_on.with_timezone(&Utc), offset_hours);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, h, 0, 0).unwrap()
    }

    #[test]
    fn utc_offset_is_the_identity() {
        let value = utc(12);
        let displayed = timezoner(value, 0.0);
        assert_eq!(displayed, value);
        assert_eq!(displayed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn conversion_is_a_pure_function_of_its_inputs() {
        let value = utc(12);
        assert_eq!(timezoner(value, -7.0), timezoner(value, -7.0));
        // The instant never changes, only its representation.
        assert_eq!(timezoner(value, -7.0).with_timezone(&Utc), value);
    }

    #[test]
    fn fractional_offsets_are_supported() {
        let displayed = timezoner(utc(12), 5.5);
        assert_eq!(displayed.offset().local_minus_utc(), 5 * 3600 + 1800);
        assert_eq!(displayed.time(), chrono::NaiveTime::from_hms_opt(17, 30, 0).unwrap());
    }

    #[test]
    fn out_of_range_offsets_fall_back_to_utc() {
        let value = utc(12);
        assert_eq!(timezoner(value, 48.0), value);
    }

    #[test]
    fn message_window_boundaries_convert_independently() {
        let mut message = Message {
            id: 1,
            title: "maintenance".to_string(),
            description: "planned downtime".to_string(),
            monitor_id: 2,
            // end_on deliberately carries a non-UTC annotation; the same
            // instant must come out regardless.
            start_on: utc(8).fixed_offset(),
            end_on: utc(10).with_timezone(&FixedOffset::east_opt(3600).unwrap()),
            created_at: utc(1).fixed_offset(),
            updated_at: utc(2).fixed_offset(),
        };
        message.localize(-7.0);
        assert_eq!(message.start_on.with_timezone(&Utc), utc(8));
        assert_eq!(message.end_on.with_timezone(&Utc), utc(10));
        assert_eq!(message.start_on.offset().local_minus_utc(), -7 * 3600);
        assert_eq!(message.end_on.offset().local_minus_utc(), -7 * 3600);
    }
}
