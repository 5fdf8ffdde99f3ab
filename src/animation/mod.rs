mod animatable;
pub mod elastic;
mod state;
mod timing;

pub use animatable::Animatable;
pub use elastic::{DragSession, ElasticDeform, JellyConfig};
pub use state::{AdvanceResult, AnimationState};
pub use timing::{is_springy, SplineSegment, TimingFunction};

/// Configuration for how a property should animate when it changes
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of the animation in milliseconds
    pub duration_ms: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in milliseconds
    pub delay_ms: f32,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0.0,
        }
    }

    /// Transition from a parsed `transition` declaration.
    pub fn from_declaration(duration_secs: f32, easing: &str) -> Self {
        Self::new(duration_secs * 1000.0, TimingFunction::from_name(easing))
    }

    /// Set the delay before the animation starts
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the duration of the animation
    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the timing function
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for Transition {
    /// `0.25s ease`, what an undeclared `transition` resolves to
    fn default() -> Self {
        Self::new(250.0, TimingFunction::EaseInOut)
    }
}
