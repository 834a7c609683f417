//! Signal bridge - observe `spark-signals` reads as a stream.
//!
//! [`watch`] runs the getter inside an `effect`. The effect tracks every
//! signal the getter reads, so the stream re-emits whenever any of them
//! changes. The effect lives exactly as long as the subscription.
//!
//! # Ownership
//!
//! The effect is created outside any active reaction and values are
//! delivered outside it too. Whatever a subscriber does with a value
//! (subscribing to other watches, reading signals) never becomes a child or
//! a dependency of this effect, so a re-run cannot destroy it.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use spark_signals::{effect, with_context, AnyReaction};

use super::{Sink, Stream, Subscription};

type ReactionRef = Option<Weak<dyn AnyReaction>>;

/// Restores the active reaction and effect when dropped.
struct Detached {
    reaction: ReactionRef,
    effect: ReactionRef,
}

impl Drop for Detached {
    fn drop(&mut self) {
        let reaction = self.reaction.take();
        let effect = self.effect.take();
        with_context(|ctx| {
            ctx.set_active_reaction(reaction);
            ctx.set_active_effect(effect);
        });
    }
}

/// Run `f` with no active reaction or effect.
pub(crate) fn detached<R>(f: impl FnOnce() -> R) -> R {
    let _restore = with_context(|ctx| Detached {
        reaction: ctx.set_active_reaction(None),
        effect: ctx.set_active_effect(None),
    });
    f()
}

/// Stream the value of `getter`, re-evaluated whenever a signal it reads
/// changes. Emits the current value immediately on subscribe.
pub fn watch<T: 'static>(getter: impl Fn() -> T + 'static) -> Stream<T> {
    let getter = Rc::new(getter);
    Stream::new(move |sink: Sink<T>| {
        let getter = Rc::clone(&getter);
        let live = Rc::new(Cell::new(true));
        let live_for_effect = live.clone();
        let stop = detached(move || {
            effect(move || {
                let value = getter();
                if live_for_effect.get() {
                    detached(|| sink.next(value));
                }
            })
        });
        Subscription::new(move || {
            live.set(false);
            stop();
        })
    })
}
