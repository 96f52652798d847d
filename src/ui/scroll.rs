pub const MAX_BLUR_PX: f64 = 20.0;
pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 100.0;
pub const SCROLL_POLL_INTERVAL_MS: u32 = 100;
pub const SCROLL_POLL_TIMEOUT_MS: f64 = 5_000.0;
// Smooth scrolling can settle on a fractional offset instead of exactly 0.
const TOP_TOLERANCE_PX: f64 = 1.0;

pub fn scroll_progress(scroll_y: f64, viewport_height: f64) -> f64 {
    if !viewport_height.is_finite() || viewport_height <= 0.0 {
        return 1.0;
    }

    let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
    (scroll_y / viewport_height).clamp(0.0, 1.0)
}

pub fn ease_in_out_cubic(progress: f64) -> f64 {
    if progress < 0.5 {
        4.0 * progress * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(3) / 2.0
    }
}

pub fn blur_for_scroll(scroll_y: f64, viewport_height: f64) -> f64 {
    ease_in_out_cubic(scroll_progress(scroll_y, viewport_height)) * MAX_BLUR_PX
}

pub fn blur_style(blur_px: f64) -> String {
    format!(
        "backdrop-filter: blur({blur_px:.2}px); -webkit-backdrop-filter: blur({blur_px:.2}px); transition: backdrop-filter 0.1s linear;"
    )
}

pub fn back_to_top_visible(scroll_y: f64, animating: bool) -> bool {
    scroll_y > BACK_TO_TOP_THRESHOLD_PX && !animating
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PollVerdict {
    Pending,
    Settled,
    TimedOut,
}

/// Tracks one programmatic scroll-to-top until the page reports the top
/// or the safety timeout elapses.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScrollToTop {
    started_at_ms: f64,
}

impl ScrollToTop {
    pub fn start(now_ms: f64) -> Self {
        Self {
            started_at_ms: now_ms,
        }
    }

    pub fn poll(&self, scroll_y: f64, now_ms: f64) -> PollVerdict {
        if scroll_y.abs() < TOP_TOLERANCE_PX {
            return PollVerdict::Settled;
        }

        if now_ms - self.started_at_ms >= SCROLL_POLL_TIMEOUT_MS {
            return PollVerdict::TimedOut;
        }

        PollVerdict::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_is_zero_at_top_and_max_one_viewport_down() {
        assert_eq!(blur_for_scroll(0.0, 800.0), 0.0);
        assert_eq!(blur_for_scroll(800.0, 800.0), 20.0);
        assert_eq!(blur_for_scroll(4_000.0, 800.0), 20.0);
    }

    #[test]
    fn blur_is_half_at_midpoint() {
        assert!((blur_for_scroll(400.0, 800.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn easing_is_monotonic_and_continuous_over_unit_interval() {
        let steps = 1_000;
        let mut previous = ease_in_out_cubic(0.0);

        for step in 1..=steps {
            let progress = f64::from(step) / f64::from(steps);
            let eased = ease_in_out_cubic(progress);
            assert!(eased >= previous, "not monotonic at {progress}");
            assert!(eased - previous < 0.01, "jump at {progress}");
            previous = eased;
        }

        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn zero_viewport_height_clamps_progress_to_one() {
        assert_eq!(scroll_progress(0.0, 0.0), 1.0);
        assert_eq!(blur_for_scroll(120.0, 0.0), 20.0);
        assert!(blur_for_scroll(f64::NAN, 800.0).is_finite());
    }

    #[test]
    fn back_to_top_hidden_while_animating() {
        assert!(!back_to_top_visible(100.0, false));
        assert!(back_to_top_visible(101.0, false));
        assert!(!back_to_top_visible(500.0, true));
    }

    #[test]
    fn scroll_poll_settles_at_top() {
        let run = ScrollToTop::start(1_000.0);
        assert_eq!(run.poll(500.0, 1_100.0), PollVerdict::Pending);
        assert_eq!(run.poll(0.0, 1_200.0), PollVerdict::Settled);
        assert_eq!(run.poll(0.4, 1_200.0), PollVerdict::Settled);
    }

    #[test]
    fn scroll_poll_gives_up_after_timeout() {
        let run = ScrollToTop::start(0.0);
        assert_eq!(run.poll(3.0, 4_999.0), PollVerdict::Pending);
        assert_eq!(run.poll(3.0, 5_000.0), PollVerdict::TimedOut);
    }

    #[test]
    fn back_to_top_click_scenario_clears_within_poll_window() {
        let run = ScrollToTop::start(0.0);
        let mut now = 0.0;
        let mut scroll_y: f64 = 500.0;

        loop {
            now += f64::from(SCROLL_POLL_INTERVAL_MS);
            scroll_y = (scroll_y - 150.0).max(0.0);
            if run.poll(scroll_y, now) != PollVerdict::Pending {
                break;
            }
        }

        // 500px reaches 0 on the fourth tick and is observed on that same tick.
        assert_eq!(now, 400.0);
        assert!(!back_to_top_visible(scroll_y, false));
    }
}
