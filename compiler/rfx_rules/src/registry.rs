//! Catalog of the built-in rules.

use rfx_engine::Rule;

use crate::{
    DrawAllocation, FloatMath, HandlerLeak, Recycle, SparseArray, UseValueOf, ViewHolder, WakeLock,
};

// Static rule instances for 'static lifetime references
static USE_VALUE_OF: UseValueOf = UseValueOf;
static FLOAT_MATH: FloatMath = FloatMath;
static SPARSE_ARRAY: SparseArray = SparseArray;
static DRAW_ALLOCATION: DrawAllocation = DrawAllocation;
static WAKE_LOCK: WakeLock = WakeLock;
static RECYCLE: Recycle = Recycle;
static VIEW_HOLDER: ViewHolder = ViewHolder;
static HANDLER_LEAK: HandlerLeak = HandlerLeak;

static ALL: &[&dyn Rule] = &[
    &USE_VALUE_OF,
    &FLOAT_MATH,
    &SPARSE_ARRAY,
    &DRAW_ALLOCATION,
    &WAKE_LOCK,
    &RECYCLE,
    &VIEW_HOLDER,
    &HANDLER_LEAK,
];

/// Every built-in rule, in default registration order.
pub fn all_rules() -> &'static [&'static dyn Rule] {
    ALL
}

/// Look up a built-in rule by its name.
pub fn by_name(name: &str) -> Option<&'static dyn Rule> {
    ALL.iter().copied().find(|r| r.name() == name)
}
