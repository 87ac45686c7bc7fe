//! Pointer interaction over the calendar grid.
//! The gesture controller resolves pointer sequences into clicks or range
//! selections; the session performs the resulting mutations.

pub mod context;
pub mod drag;
pub mod session;

pub use context::{GesturePhase, InteractionContext, PickTarget, Tool};
pub use drag::{ClickAction, GestureController, GestureOutcome, ReleaseListener};
pub use session::{PlannerSession, SessionEffect};
