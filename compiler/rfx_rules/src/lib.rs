//! Reference rule catalog for the rfx rewrite engine.
//!
//! Each rule is a zero-sized type implementing [`rfx_engine::Rule`]. The
//! catalog order in [`all_rules`] is the registration order used when no
//! explicit selection is made:
//!
//! - `use-value-of`: boxing through factories and parse methods
//! - `float-math`: `FloatMath` calls to `Math` with a narrowing cast
//! - `sparse-array`: integer-keyed maps to Android sparse arrays
//! - `draw-allocation`: allocations in `onDraw` hoisted to fields
//! - `wake-lock`: wake locks released in `onPause`
//! - `recycle`: cursors and typed arrays released after last use
//! - `view-holder`: adapter views and child lookups reused in `getView`
//! - `handler-leak`: anonymous handlers made static with a weak reference
//!
//! Android rules only apply when [`rfx_ir::ProjectOptions::android`] is set.

mod draw_allocation;
mod float_math;
mod handler_leak;
mod recycle;
mod registry;
mod sparse_array;
mod util;
mod value_of;
mod view_holder;
mod wake_lock;

pub use draw_allocation::DrawAllocation;
pub use float_math::FloatMath;
pub use handler_leak::HandlerLeak;
pub use recycle::Recycle;
pub use registry::{all_rules, by_name};
pub use sparse_array::SparseArray;
pub use value_of::UseValueOf;
pub use view_holder::ViewHolder;
pub use wake_lock::WakeLock;

#[cfg(test)]
mod test_util;
