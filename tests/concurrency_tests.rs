//! # Concurrency Tests using Loom
//!
//! The run loop is sequential, but the Ctrl-C handler cancels the stop token
//! from another task. `CancellationToken` is not loom-instrumented, so these
//! models stand it in with a loom `AtomicBool` (set once, read with `SeqCst`
//! like `is_cancelled`) and keep the result log as a loom `Mutex<Vec<_>>`.
//! The loop body mirrors `run_batch`: check the stop flag before each case,
//! append a row only for a case that ran, skip everything after a stop.

#[cfg(test)]
mod tests {
    use loom::sync::atomic::{AtomicBool, Ordering};
    use loom::sync::{Arc, Mutex};
    use loom::thread;

    const CASES: [&str; 2] = ["a.txt", "b.txt"];

    fn run_model<F>(model: F)
    where
        F: Fn() + Sync + Send + 'static,
    {
        const STACK_SIZE: usize = 8 * 1024 * 1024; // 8 MB

        let handle = std::thread::Builder::new()
            .name("loom-test-thread".into())
            .stack_size(STACK_SIZE)
            .spawn(move || loom::model(model))
            .unwrap();
        handle.join().unwrap();
    }

    /// Returns the cases that ran and the cases that were skipped.
    fn sequential_loop(
        stop: &AtomicBool,
        log: &Mutex<Vec<&'static str>>,
    ) -> (Vec<&'static str>, Vec<&'static str>) {
        let mut ran = Vec::new();
        let mut pending = CASES.iter();
        while let Some(case) = pending.next() {
            if stop.load(Ordering::SeqCst) {
                let mut skipped = vec![*case];
                skipped.extend(pending.copied());
                return (ran, skipped);
            }
            log.lock().unwrap().push(*case);
            ran.push(*case);
        }
        (ran, Vec::new())
    }

    #[test]
    fn test_interrupt_leaves_log_as_prefix_of_cases() {
        run_model(|| {
            let stop = Arc::new(AtomicBool::new(false));
            let log = Arc::new(Mutex::new(Vec::new()));

            let loop_stop = stop.clone();
            let loop_log = log.clone();
            let runner = thread::spawn(move || sequential_loop(&loop_stop, &loop_log));

            let handler_stop = stop.clone();
            let handler = thread::spawn(move || handler_stop.store(true, Ordering::SeqCst));

            let (ran, skipped) = runner.join().unwrap();
            handler.join().unwrap();

            let rows = log.lock().unwrap().clone();
            assert_eq!(rows, ran);
            assert_eq!(ran.len() + skipped.len(), CASES.len());
            assert_eq!(&CASES[..ran.len()], rows.as_slice());
            assert!(skipped.iter().all(|case| !rows.contains(case)));
        });
    }

    #[test]
    fn test_cancel_before_start_is_observed() {
        run_model(|| {
            let stop = Arc::new(AtomicBool::new(false));
            let log = Arc::new(Mutex::new(Vec::new()));
            stop.store(true, Ordering::SeqCst);

            let loop_stop = stop.clone();
            let loop_log = log.clone();
            let runner = thread::spawn(move || sequential_loop(&loop_stop, &loop_log));

            let (ran, skipped) = runner.join().unwrap();
            assert!(ran.is_empty());
            assert_eq!(skipped, CASES);
            assert!(log.lock().unwrap().is_empty());
        });
    }
}
