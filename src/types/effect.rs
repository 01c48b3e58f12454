/// A mutation recipe tagged with the slot it competes for.
///
/// Effects are produced by the host effect parser at load time. During an
/// evaluation, at most one effect per expected slot is applied: the one
/// carried by the highest-priority satisfied rule.
pub trait Effect<C>: Send + Sync {
    /// Outcome category this effect fills.
    fn slot(&self) -> i32;

    fn apply(&self, ctx: &mut C);
}

impl<C, E> Effect<C> for Box<E>
where
    E: Effect<C> + ?Sized,
{
    fn slot(&self) -> i32 {
        (**self).slot()
    }

    fn apply(&self, ctx: &mut C) {
        (**self).apply(ctx);
    }
}

/// An [`Effect`] built from a slot id and a closure. See [`effect()`].
pub struct FnEffect<F> {
    slot: i32,
    f: F,
}

impl<C, F> Effect<C> for FnEffect<F>
where
    F: Fn(&mut C) + Send + Sync,
{
    fn slot(&self) -> i32 {
        self.slot
    }

    fn apply(&self, ctx: &mut C) {
        (self.f)(ctx);
    }
}

/// Wrap a closure as an effect for `slot`.
///
/// ```
/// use slotrules::{effect, Effect};
///
/// let double = effect(0, |n: &mut i64| *n *= 2);
/// let mut n = 21;
/// double.apply(&mut n);
/// assert_eq!(n, 42);
/// assert_eq!(Effect::<i64>::slot(&double), 0);
/// ```
#[must_use]
pub fn effect<F>(slot: i32, f: F) -> FnEffect<F> {
    FnEffect { slot, f }
}
