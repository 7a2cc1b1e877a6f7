use dioxus::prelude::*;

/// Runs `f` after `ms`. Safe to call from raw DOM callbacks, which run
/// outside any component scope. Nothing cancels the timer when a component
/// unmounts, so callbacks that touch component state go through
/// [`after_update`].
pub fn after(ms: u32, f: impl FnOnce() + 'static) {
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(ms).await;
        f();
    });
    #[cfg(not(target_arch = "wasm32"))]
    host_clock::schedule(ms, Box::new(f));
}

/// Applies `update` to `signal` after `ms`. The write is skipped when the
/// component owning `signal` has unmounted in the meantime.
pub fn after_update<T: 'static>(ms: u32, signal: Signal<T>, update: impl FnOnce(&mut T) + 'static) {
    after(ms, move || {
        #[allow(unused_mut)]
        let mut signal = signal;
        match signal.try_write() {
            Ok(mut value) => update(&mut *value),
            Err(_) => tracing::debug!("timers: owner unmounted, update dropped"),
        };
    });
}

/// Host builds only exist for tests. Timers there wait on a virtual clock
/// that tests move with [`advance`].
#[cfg(not(target_arch = "wasm32"))]
mod host_clock {
    use std::cell::{Cell, RefCell};

    type Pending = (u64, u64, Box<dyn FnOnce()>);

    thread_local! {
        static NOW_MS: Cell<u64> = const { Cell::new(0) };
        static NEXT_SEQ: Cell<u64> = const { Cell::new(0) };
        static PENDING: RefCell<Vec<Pending>> = RefCell::new(Vec::new());
    }

    pub(super) fn schedule(ms: u32, f: Box<dyn FnOnce()>) {
        let due = NOW_MS.with(Cell::get) + u64::from(ms);
        let seq = NEXT_SEQ.with(|next| {
            let seq = next.get();
            next.set(seq + 1);
            seq
        });
        PENDING.with(|pending| pending.borrow_mut().push((due, seq, f)));
    }

    #[cfg(test)]
    pub(super) fn advance(ms: u32) -> usize {
        let target = NOW_MS.with(Cell::get) + u64::from(ms);
        let mut fired = 0;
        loop {
            let next = PENDING.with(|pending| {
                let mut pending = pending.borrow_mut();
                let position = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, (due, _, _))| *due <= target)
                    .min_by_key(|(_, (due, seq, _))| (*due, *seq))
                    .map(|(position, _)| position)?;
                Some(pending.remove(position))
            });
            let Some((due, _, f)) = next else {
                break;
            };
            NOW_MS.with(|now| now.set(due));
            f();
            fired += 1;
        }
        NOW_MS.with(|now| now.set(target));
        fired
    }
}

/// Moves the host timer clock forward by `ms` and runs every timer that
/// comes due, in order. Returns how many fired.
#[cfg(all(test, not(target_arch = "wasm32")))]
pub fn advance(ms: u32) -> usize {
    host_clock::advance(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    #[test]
    fn timers_wait_for_their_delay_and_run_in_due_order() {
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        after(300, move || log.borrow_mut().push("slow"));
        let log = Rc::clone(&seen);
        after(100, move || {
            log.borrow_mut().push("fast");
            let log = Rc::clone(&log);
            after(50, move || log.borrow_mut().push("chained"));
        });

        assert!(seen.borrow().is_empty());
        assert_eq!(advance(99), 0);
        assert_eq!(advance(1), 1);
        assert_eq!(advance(200), 2);
        assert_eq!(*seen.borrow(), vec!["fast", "chained", "slow"]);
    }

    thread_local! {
        static COUNTER: std::cell::Cell<Option<Signal<u32>>> = const { std::cell::Cell::new(None) };
    }

    fn counting_app() -> Element {
        let count = use_signal(|| 0u32);
        use_hook(move || {
            COUNTER.with(|slot| slot.set(Some(count)));
            after_update(500, count, |count| *count += 1);
        });
        rsx! { "{count}" }
    }

    #[test]
    fn update_lands_while_the_owner_is_mounted() {
        let mut dom = VirtualDom::new(counting_app);
        dom.rebuild_in_place();
        let count = COUNTER.with(|slot| slot.get()).expect("app stored its signal");

        dom.in_runtime(|| {
            assert_eq!(advance(500), 1);
            assert_eq!(*count.peek(), 1);
        });
    }

    #[test]
    fn update_after_unmount_is_dropped_quietly() {
        let mut dom = VirtualDom::new(counting_app);
        dom.rebuild_in_place();
        drop(dom);

        assert_eq!(advance(500), 1);
    }
}
