use scores_api::Event;
use std::time::{Duration, Instant};

/// Owns the filtered event list and which entry is on screen.
///
/// Two clocks drive it: data refreshes call `replace_events`, the cycle tick
/// calls `tick`. Callers hold the App lock around every call, so a reader
/// never sees the list and the index out of step.
#[derive(Debug)]
pub struct RotationScheduler {
    events: Vec<Event>,
    current_index: usize,
    period: Duration,
    next_rotation_at: Instant,
}

impl RotationScheduler {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            events: Vec::new(),
            current_index: 0,
            period,
            next_rotation_at: now + period,
        }
    }

    /// Swap in a fresh list, staying on the event being watched if it survived.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        let previous_id = self.current().map(|e| e.id.clone());
        self.events = events;
        self.current_index = previous_id
            .and_then(|id| self.events.iter().position(|e| e.id == id))
            .unwrap_or(0);
    }

    /// Move by `delta` entries with wraparound in both directions.
    pub fn advance(&mut self, delta: isize) {
        if self.events.is_empty() {
            return;
        }
        let len = self.events.len() as isize;
        self.current_index = (self.current_index as isize + delta).rem_euclid(len) as usize;
    }

    /// Manual previous/next. Restarts the countdown so the viewer gets a full period.
    pub fn navigate(&mut self, delta: isize, now: Instant) {
        self.advance(delta);
        self.next_rotation_at = now + self.period;
    }

    /// Cycle timer hook. Returns true when the displayed event changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_rotation_at {
            return false;
        }
        self.next_rotation_at = now + self.period;
        let before = self.current_index;
        self.advance(1);
        self.events.len() > 1 && before != self.current_index
    }

    /// Fraction of the current period already elapsed, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.period.is_zero() {
            return 1.0;
        }
        let Some(started_at) = self.next_rotation_at.checked_sub(self.period) else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(started_at);
        (elapsed.as_secs_f64() / self.period.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn current(&self) -> Option<&Event> {
        self.events.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(10);

    fn event(id: &str) -> Event {
        Event { id: id.to_string(), name: format!("event {id}"), ..Default::default() }
    }

    fn events(ids: &[&str]) -> Vec<Event> {
        ids.iter().map(|id| event(id)).collect()
    }

    fn scheduler_showing(ids: &[&str], index: isize) -> (RotationScheduler, Instant) {
        let now = Instant::now();
        let mut scheduler = RotationScheduler::new(PERIOD, now);
        scheduler.replace_events(events(ids));
        scheduler.advance(index);
        (scheduler, now)
    }

    fn current_id(scheduler: &RotationScheduler) -> Option<&str> {
        scheduler.current().map(|e| e.id.as_str())
    }

    #[test]
    fn refresh_keeps_the_watched_event() {
        let (mut scheduler, _) = scheduler_showing(&["A", "B", "C"], 1);
        assert_eq!(current_id(&scheduler), Some("B"));

        scheduler.replace_events(events(&["B", "C", "D"]));
        assert_eq!(scheduler.current_index(), 0);
        assert_eq!(current_id(&scheduler), Some("B"));

        scheduler.replace_events(events(&["X", "Y", "B"]));
        assert_eq!(scheduler.current_index(), 2);
    }

    #[test]
    fn refresh_falls_back_to_first_when_watched_event_disappears() {
        let (mut scheduler, _) = scheduler_showing(&["A", "B", "C"], 1);
        scheduler.replace_events(events(&["A", "C"]));
        assert_eq!(scheduler.current_index(), 0);
        assert_eq!(current_id(&scheduler), Some("A"));
    }

    #[test]
    fn refresh_uses_first_match_for_duplicate_ids() {
        let (mut scheduler, _) = scheduler_showing(&["A", "B"], 1);
        scheduler.replace_events(events(&["C", "B", "B"]));
        assert_eq!(scheduler.current_index(), 1);
    }

    #[test]
    fn advance_wraps_both_directions() {
        let (mut scheduler, _) = scheduler_showing(&["A", "B", "C"], 2);
        scheduler.advance(1);
        assert_eq!(scheduler.current_index(), 0);
        scheduler.advance(-1);
        assert_eq!(scheduler.current_index(), 2);
        scheduler.advance(-7);
        assert_eq!(scheduler.current_index(), 1);
    }

    #[test]
    fn empty_list_operations_are_no_ops() {
        let now = Instant::now();
        let mut scheduler = RotationScheduler::new(PERIOD, now);
        scheduler.advance(1);
        scheduler.advance(-1);
        assert_eq!(scheduler.current_index(), 0);
        assert!(scheduler.current().is_none());

        scheduler.replace_events(Vec::new());
        assert_eq!(scheduler.current_index(), 0);
        assert!(!scheduler.tick(now + PERIOD));
    }

    #[test]
    fn emptied_list_resets_index() {
        let (mut scheduler, _) = scheduler_showing(&["A", "B", "C"], 2);
        scheduler.replace_events(Vec::new());
        assert_eq!(scheduler.current_index(), 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn tick_rotates_only_when_due() {
        let (mut scheduler, start) = scheduler_showing(&["A", "B"], 0);
        assert!(!scheduler.tick(start + Duration::from_secs(9)));
        assert_eq!(current_id(&scheduler), Some("A"));

        assert!(scheduler.tick(start + PERIOD));
        assert_eq!(current_id(&scheduler), Some("B"));

        // next rotation is a full period after the one that just happened
        assert!(!scheduler.tick(start + PERIOD + Duration::from_secs(5)));
        assert!(scheduler.tick(start + PERIOD * 2));
        assert_eq!(current_id(&scheduler), Some("A"));
    }

    #[test]
    fn single_event_tick_reports_no_change() {
        let (mut scheduler, start) = scheduler_showing(&["A"], 0);
        assert!(!scheduler.tick(start + PERIOD));
        assert_eq!(current_id(&scheduler), Some("A"));
    }

    #[test]
    fn progress_is_clamped_fraction_of_period() {
        let (scheduler, start) = scheduler_showing(&["A", "B"], 0);
        assert_eq!(scheduler.progress(start), 0.0);
        let half = scheduler.progress(start + Duration::from_secs(5));
        assert!((half - 0.5).abs() < 1e-9, "got {half}");
        assert_eq!(scheduler.progress(start + Duration::from_secs(60)), 1.0);
    }

    #[test]
    fn manual_navigation_restarts_progress() {
        let (mut scheduler, start) = scheduler_showing(&["A", "B", "C"], 0);
        let later = start + Duration::from_secs(8);
        assert!(scheduler.progress(later) > 0.7);

        scheduler.navigate(-1, later);
        assert_eq!(current_id(&scheduler), Some("C"));
        assert_eq!(scheduler.progress(later), 0.0);
        assert!(!scheduler.tick(start + PERIOD), "countdown was restarted");
    }
}
