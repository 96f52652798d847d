pub const CLOCK_TICK_MS: u32 = 1_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Am => "A",
            Self::Pm => "P",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ClockFace {
    pub hour_angle: f64,
    pub minute_angle: f64,
    pub second_angle: f64,
    pub hour12: u32,
    pub meridiem: Meridiem,
    pub minute_text: String,
    pub second_text: String,
}

impl ClockFace {
    pub fn from_time(time: TimeOfDay) -> Self {
        let hour = time.hour % 24;
        let minute = time.minute % 60;
        let second = time.second % 60;

        let hour12 = match hour {
            0 => 12,
            13..=23 => hour - 12,
            other => other,
        };
        let meridiem = if hour < 12 { Meridiem::Am } else { Meridiem::Pm };

        let second_fraction = f64::from(second) / 60.0;
        let minute_fraction = (f64::from(minute) + second_fraction) / 60.0;
        // 12 o'clock sits at the top of the dial, same as 0.
        let hour_fraction = (f64::from(hour12 % 12) + minute_fraction) / 12.0;

        Self {
            hour_angle: 360.0 * hour_fraction,
            minute_angle: 360.0 * minute_fraction,
            second_angle: 360.0 * second_fraction,
            hour12,
            meridiem,
            minute_text: format!("{minute:02}"),
            second_text: format!("{second:02}"),
        }
    }

    pub fn digits(&self) -> String {
        format!(
            "{}:{}:{} {}",
            self.hour12,
            self.minute_text,
            self.second_text,
            self.meridiem.marker()
        )
    }

    pub fn css_vars(&self) -> String {
        format!(
            "--hour-angle: {:.3}deg; --minute-angle: {:.3}deg; --second-angle: {:.3}deg;",
            self.hour_angle, self.minute_angle, self.second_angle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(hour: u32, minute: u32, second: u32) -> ClockFace {
        ClockFace::from_time(TimeOfDay {
            hour,
            minute,
            second,
        })
    }

    #[test]
    fn midnight_displays_as_twelve_am() {
        let midnight = face(0, 5, 9);
        assert_eq!(midnight.hour12, 12);
        assert_eq!(midnight.meridiem.marker(), "A");
        assert_eq!(midnight.minute_text, "05");
        assert_eq!(midnight.second_text, "09");
        assert_eq!(midnight.digits(), "12:05:09 A");
    }

    #[test]
    fn afternoon_hours_fold_to_twelve_hour_format() {
        assert_eq!(face(13, 0, 0).hour12, 1);
        assert_eq!(face(23, 0, 0).hour12, 11);
        let noon = face(12, 30, 0);
        assert_eq!(noon.hour12, 12);
        assert_eq!(noon.meridiem, Meridiem::Pm);
    }

    #[test]
    fn hands_rotate_fractionally() {
        let quarter_past_three = face(15, 15, 30);
        assert!((quarter_past_three.second_angle - 180.0).abs() < 1e-9);
        assert!((quarter_past_three.minute_angle - 93.0).abs() < 1e-9);
        assert!((quarter_past_three.hour_angle - 97.75).abs() < 1e-9);
    }

    #[test]
    fn every_angle_stays_below_full_turn() {
        for hour in 0..24 {
            for minute in 0..60 {
                for second in (0..60).step_by(7) {
                    let face = face(hour, minute, second);
                    for angle in [face.hour_angle, face.minute_angle, face.second_angle] {
                        assert!((0.0..360.0).contains(&angle), "{hour}:{minute}:{second} -> {angle}");
                    }
                }
            }
        }
    }

    #[test]
    fn css_vars_carry_all_three_hands() {
        let vars = face(6, 0, 0).css_vars();
        assert!(vars.contains("--hour-angle: 180.000deg"));
        assert!(vars.contains("--minute-angle: 0.000deg"));
        assert!(vars.contains("--second-angle: 0.000deg"));
    }
}
