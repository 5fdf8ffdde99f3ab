pub mod action_group;
pub mod button;
pub mod overlay;
pub mod toggle;
pub mod widget;
pub mod wrap;

pub use action_group::{ActionGroup, Anchor, Direction, GroupState, SlotItem, StyledSlot};
pub use button::Button;
pub use overlay::{Overlay, OverlayProps, OverlayTick, RenderMode, ShadowFade, OVERLAY_MULTIPLIER};
pub use toggle::Toggle;
pub use widget::{ChangeFlags, Color, ControlEvent, ControlEventKind, ControlId, Point, Rect, Size};
pub use wrap::Wrap;
