use crate::animation::{Animatable, Transition};

/// Result of advancing an animation, indicating whether the value changed
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Value did not change (animation not running, still delayed, or same value)
    NoChange,
    /// Value changed to a new value
    Changed(T),
    /// The animation reached its end on this tick and holds the target value
    Finished(T),
}

impl<T> AdvanceResult<T> {
    /// Returns true if the value changed, including on the final tick
    pub fn is_changed(&self) -> bool {
        matches!(self, AdvanceResult::Changed(_) | AdvanceResult::Finished(_))
    }

    /// Returns true if this tick completed the animation
    pub fn is_finished(&self) -> bool {
        matches!(self, AdvanceResult::Finished(_))
    }
}

/// Animation state for animatable properties.
///
/// Time is supplied by the caller through [`AnimationState::advance`], so the
/// same state machine runs under a real frame clock and in tests.
pub struct AnimationState<T: Animatable> {
    /// Current interpolated value
    current: T,
    /// Value the running animation ends at
    target: T,
    /// Value when animation started
    start: T,
    /// Time spent in the current run, including the delay
    elapsed_ms: f32,
    /// Transition configuration of the current run
    transition: Transition,
    running: bool,
    /// Bumped on every start so owners can tell runs apart
    generation: u64,
}

impl<T: Animatable> AnimationState<T> {
    pub fn new(initial_value: T, transition: Transition) -> Self {
        Self {
            current: initial_value.clone(),
            target: initial_value.clone(),
            start: initial_value,
            elapsed_ms: 0.0,
            transition,
            running: false,
            generation: 0,
        }
    }

    /// Start animating from the current value to `new_target`.
    ///
    /// Any run in flight is cancelled first.
    pub fn animate_to(&mut self, new_target: T, transition: Transition) {
        let from = self.current.clone();
        self.animate(from, new_target, transition);
    }

    /// Start animating from an explicit start value.
    pub fn animate(&mut self, from: T, to: T, transition: Transition) {
        self.current = from.clone();
        self.start = from;
        self.target = to;
        self.transition = transition;
        self.elapsed_ms = 0.0;
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Advance the animation by `dt_ms` and report what happened to the value
    pub fn advance(&mut self, dt_ms: f32) -> AdvanceResult<T> {
        if !self.running {
            return AdvanceResult::NoChange;
        }

        self.elapsed_ms += dt_ms.max(0.0);
        let adjusted_elapsed = self.elapsed_ms - self.transition.delay_ms;
        if adjusted_elapsed < 0.0 {
            // Still in delay period
            return AdvanceResult::NoChange;
        }

        let t = if self.transition.duration_ms <= 0.0 {
            1.0
        } else {
            (adjusted_elapsed / self.transition.duration_ms).min(1.0)
        };

        if t >= 1.0 {
            self.running = false;
            self.current = self.target.clone();
            return AdvanceResult::Finished(self.current.clone());
        }

        let eased_t = self.transition.timing.evaluate(t);
        let new_value = T::lerp(&self.start, &self.target, eased_t);
        if new_value == self.current {
            return AdvanceResult::NoChange;
        }
        self.current = new_value.clone();
        AdvanceResult::Changed(new_value)
    }

    /// Check if animation is still running
    pub fn is_animating(&self) -> bool {
        self.running
    }

    /// Whether a run toward `target` is already in flight
    pub fn is_animating_to(&self, target: &T) -> bool {
        self.running && self.target == *target
    }

    /// Get current value
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Get target value
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Normalised progress of the current run, 1.0 when idle
    pub fn progress(&self) -> f32 {
        if !self.running {
            return 1.0;
        }
        if self.transition.duration_ms <= 0.0 {
            return 0.0;
        }
        ((self.elapsed_ms - self.transition.delay_ms) / self.transition.duration_ms).clamp(0.0, 1.0)
    }

    /// Set value immediately without animation, cancelling any run
    pub fn set_immediate(&mut self, value: T) {
        self.current = value.clone();
        self.target = value.clone();
        self.start = value;
        self.running = false;
    }

    /// Stop where we are; the current value is kept
    pub fn stop(&mut self) {
        self.running = false;
        self.target = self.current.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TimingFunction;

    fn linear(ms: f32) -> Transition {
        Transition::new(ms, TimingFunction::Linear)
    }

    #[test]
    fn test_animation_state_new() {
        let state = AnimationState::new(0.0f32, linear(300.0));

        assert_eq!(*state.current(), 0.0);
        assert_eq!(*state.target(), 0.0);
        assert!(!state.is_animating()); // Starts completed
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_animation_state_animate_to() {
        let mut state = AnimationState::new(0.0f32, linear(300.0));

        state.animate_to(100.0, linear(100.0));
        assert_eq!(*state.target(), 100.0);
        assert!(state.is_animating());

        assert_eq!(state.advance(50.0), AdvanceResult::Changed(50.0));
        assert_eq!(state.advance(50.0), AdvanceResult::Finished(100.0));
        assert!(!state.is_animating());
        assert_eq!(state.advance(16.0), AdvanceResult::NoChange);
    }

    #[test]
    fn test_restart_cancels_and_starts_from_current() {
        let mut state = AnimationState::new(0.0f32, linear(100.0));
        state.animate_to(100.0, linear(100.0));
        state.advance(25.0);
        let first = state.generation();

        state.animate_to(0.0, linear(100.0));
        assert_ne!(state.generation(), first);
        assert_eq!(state.advance(50.0), AdvanceResult::Changed(12.5));
    }

    #[test]
    fn test_delay_holds_start_value() {
        let mut state = AnimationState::new(0.0f32, linear(100.0));
        state.animate(0.0, 10.0, linear(100.0).delay(40.0));

        assert_eq!(state.advance(30.0), AdvanceResult::NoChange);
        assert_eq!(*state.current(), 0.0);
        assert_eq!(state.advance(60.0), AdvanceResult::Changed(5.0));
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut state = AnimationState::new(1.0f32, linear(0.0));
        state.animate_to(2.0, linear(0.0));
        assert!(state.advance(0.0).is_finished());
        assert_eq!(*state.current(), 2.0);
    }

    #[test]
    fn test_animation_state_set_immediate() {
        let mut state = AnimationState::new(0.0f32, linear(300.0));
        state.animate_to(100.0, linear(300.0));

        state.set_immediate(50.0);

        assert_eq!(*state.current(), 50.0);
        assert_eq!(*state.target(), 50.0);
        assert!(!state.is_animating());
    }

    #[test]
    fn test_stop_keeps_current() {
        let mut state = AnimationState::new(0.0f32, linear(100.0));
        state.animate_to(10.0, linear(100.0));
        state.advance(50.0);
        state.stop();
        assert_eq!(*state.current(), 5.0);
        assert!(!state.is_animating_to(&10.0));
    }
}
