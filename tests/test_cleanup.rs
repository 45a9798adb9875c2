#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use sealed_stream::cleanup::{CleanupRegistry, ReclaimHint};
    use sealed_stream::logging::Logger;

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let registry = CleanupRegistry::new();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.register(Box::new(move || {
                order.lock().unwrap().push(name);
                Ok(())
            }));
        }

        let logger = Logger::new();
        let failed = registry.run_all(&logger);

        assert_eq!(failed, 0);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_callback_is_contained() {
        let registry = CleanupRegistry::new();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        {
            let order = Arc::clone(&order);
            registry.register(Box::new(move || {
                order.lock().unwrap().push("ok-before");
                Ok(())
            }));
        }
        registry.register(Box::new(|| Err("release handle failed".into())));
        {
            let order = Arc::clone(&order);
            registry.register(Box::new(move || {
                order.lock().unwrap().push("ok-after");
                Ok(())
            }));
        }

        let logger = Logger::new();
        let failed = registry.run_all(&logger);

        // The failure is logged as a warning and the next callback runs.
        assert_eq!(failed, 1);
        assert_eq!(*order.lock().unwrap(), vec!["ok-before", "ok-after"]);
        assert_eq!(logger.count_containing("cleanup callback 1 failed"), 1);
    }

    #[test]
    fn test_no_dedup_on_registration() {
        let registry = CleanupRegistry::new();
        let count = Arc::new(Mutex::new(0u32));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            registry.register(Box::new(move || {
                *count.lock().unwrap() += 1;
                Ok(())
            }));
        }

        assert_eq!(registry.len(), 2);
        registry.run_all(&Logger::new());
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_reclaim_hint_fires_after_callbacks() {
        struct FlagHint(Arc<AtomicBool>);
        impl ReclaimHint for FlagHint {
            fn reclaim(&self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let fired = Arc::new(AtomicBool::new(false));
        let registry = CleanupRegistry::with_reclaim_hint(Box::new(FlagHint(Arc::clone(&fired))));
        registry.register(Box::new(|| Err("still fails".into())));

        registry.run_all(&Logger::new());
        // Hint fires even when callbacks failed.
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_counter_tracks_invocations() {
        let registry = CleanupRegistry::new();
        assert_eq!(registry.runs(), 0);

        let logger = Logger::new();
        registry.run_all(&logger);
        registry.run_all(&logger);
        assert_eq!(registry.runs(), 2);
    }

    #[test]
    fn test_empty_registry_runs_cleanly() {
        let registry = CleanupRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.run_all(&Logger::new()), 0);
    }
}
