//! Lock guard: the Draft -> Committed gate on structural fields.
//!
//! ```text
//! Draft --[commit acknowledged]--> Committed
//! ```
//!
//! `Draft` loops on every accepted mutation. `Committed` has no outgoing
//! transition.

use shule_models::LifecycleState;

use crate::field::Field;

/// Whether `field` may be mutated in `state`.
///
/// Profile fields always pass. Structural fields pass only in `Draft`; the
/// derivation engine may still disable them for other reasons.
pub const fn can_mutate(field: Field, state: LifecycleState) -> bool {
    match state {
        LifecycleState::Draft => true,
        LifecycleState::Committed => !field.is_structural(),
    }
}

/// The state after a successful persistence acknowledgment.
pub const fn on_commit_acknowledged(state: LifecycleState) -> LifecycleState {
    match state {
        LifecycleState::Draft | LifecycleState::Committed => LifecycleState::Committed,
    }
}
