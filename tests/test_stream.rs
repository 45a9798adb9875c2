#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use proptest::prelude::*;
    use sealed_stream::cleanup::CleanupRegistry;
    use sealed_stream::crypto::{generate_salt, CipherService};
    use sealed_stream::logging::Logger;
    use sealed_stream::memory::{FixedSampler, MemorySampler, ScriptedSampler};
    use sealed_stream::processor::RecordProcessor;
    use sealed_stream::record::Record;
    use sealed_stream::stream::{validate_stream_params, CoordinatorState, StreamCoordinator};
    use sealed_stream::telemetry::ProgressEvent;
    use sealed_stream::types::StreamError;

    fn calm_coordinator(chunk_size: usize, logger: Logger) -> StreamCoordinator {
        let sampler: Arc<dyn MemorySampler> = Arc::new(FixedSampler::at_percent(10.0));
        let cleanup = Arc::new(CleanupRegistry::new());
        StreamCoordinator::new(chunk_size, sampler, cleanup, logger)
    }

    #[test]
    fn test_two_chunk_scenario() {
        let mut coordinator = calm_coordinator(500, Logger::new());
        let data: Vec<usize> = (0..1000).collect();

        let chunk_calls: Arc<Mutex<Vec<(usize, usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let chunk_sink = Arc::clone(&chunk_calls);
        let mut on_chunk = move |results: &[usize], index: usize, total: usize| {
            chunk_sink.lock().unwrap().push((results.len(), index, total));
        };

        let progress: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let progress_sink = Arc::clone(&progress);
        let mut on_progress = move |event: ProgressEvent| {
            progress_sink.lock().unwrap().push(event);
        };

        let results = coordinator
            .process_stream(
                data,
                |item, _| Ok::<_, StreamError>(*item),
                Some(&mut on_chunk),
                Some(&mut on_progress),
            )
            .unwrap();

        assert_eq!(results, (0..1000).collect::<Vec<_>>());

        // Exactly 2 chunks, 2 on_chunk invocations.
        let chunk_calls = chunk_calls.lock().unwrap();
        assert_eq!(*chunk_calls, vec![(500, 0, 2), (500, 1, 2)]);

        // Final progress event shows 100% and chunk 2/2.
        let progress = progress.lock().unwrap();
        let last = progress.last().unwrap();
        assert_eq!(last.processed, 1000);
        assert!((last.percentage - 100.0).abs() < 0.001);
        assert_eq!(last.current_chunk, Some(2));
        assert_eq!(last.total_chunks, Some(2));

        assert_eq!(coordinator.state(), CoordinatorState::Completed);
        let snapshot = coordinator.snapshot().unwrap();
        assert_eq!(snapshot.items_ok, 1000);
        assert_eq!(snapshot.chunks_completed, 2);
        assert!(snapshot.sanity_check());
    }

    #[test]
    fn test_chunk_size_exceeding_dataset_is_rejected() {
        let logger = Logger::new();
        let mut coordinator = calm_coordinator(600, logger.clone());
        let data: Vec<usize> = (0..500).collect();

        let called = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&called);
        let err = coordinator
            .process_stream(
                data,
                move |item, _| {
                    *sink.lock().unwrap() += 1;
                    Ok::<_, StreamError>(*item)
                },
                None,
                None,
            )
            .unwrap_err();

        let report = err.report();
        assert_eq!(report.kind, "validation");
        assert!(report.message.contains("exceeds dataset size"));

        // No processing performed, no log lines written.
        assert_eq!(*called.lock().unwrap(), 0);
        assert!(logger.is_empty());
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert!(coordinator.snapshot().is_none());
    }

    #[test]
    fn test_dataset_out_of_bounds_is_rejected() {
        let mut coordinator = calm_coordinator(10, Logger::new());
        let data: Vec<usize> = (0..100).collect();
        let err = coordinator
            .process_stream(data, |item, _| Ok::<_, StreamError>(*item), None, None)
            .unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)));
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let err = validate_stream_params(1000, 0).unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)));
    }

    #[test]
    fn test_uneven_final_chunk() {
        let mut coordinator = calm_coordinator(300, Logger::new());
        let data: Vec<usize> = (0..1000).collect();

        let sizes: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sizes);
        let mut on_chunk = move |results: &[usize], _: usize, total: usize| {
            assert_eq!(total, 4);
            sink.lock().unwrap().push(results.len());
        };

        let results = coordinator
            .process_stream(
                data,
                |item, _| Ok::<_, StreamError>(*item),
                Some(&mut on_chunk),
                None,
            )
            .unwrap();

        assert_eq!(results.len(), 1000);
        assert_eq!(*sizes.lock().unwrap(), vec![300, 300, 300, 100]);
    }

    #[test]
    fn test_order_preserved_across_chunks_with_failures() {
        let mut coordinator = calm_coordinator(300, Logger::new());
        let data: Vec<usize> = (0..1000).collect();

        let results = coordinator
            .process_stream(
                data,
                |item, index| {
                    if index % 7 == 0 {
                        Err(StreamError::Validation("synthetic".into()))
                    } else {
                        Ok(*item)
                    }
                },
                None,
                None,
            )
            .unwrap();

        // ceil(1000 / 7) = 143 failures.
        assert_eq!(results.len(), 1000 - 143);
        assert!(results.windows(2).all(|w| w[0] < w[1]));
        assert!(results.iter().all(|v| v % 7 != 0));

        let snapshot = coordinator.snapshot().unwrap();
        assert_eq!(snapshot.items_failed, 143);
        assert_eq!(snapshot.items_total(), 1000);
    }

    #[test]
    fn test_chunk_level_pressure_triggers_cleanup() {
        // Calm for all 500 item samples of chunk 0, then 76% on the
        // chunk-level check, calm afterwards.
        let mut script = vec![10.0f64; 500];
        script.push(76.0);
        let sampler: Arc<dyn MemorySampler> = Arc::new(ScriptedSampler::percents(&script, 10.0));
        let cleanup = Arc::new(CleanupRegistry::new());
        let logger = Logger::new();

        let processor = RecordProcessor::new(
            Arc::clone(&sampler),
            Arc::clone(&cleanup),
            logger.clone(),
        )
        .with_pressure_pause(Duration::ZERO);
        let mut coordinator =
            StreamCoordinator::new(500, sampler, Arc::clone(&cleanup), logger.clone())
                .with_processor(processor);

        let data: Vec<usize> = (0..1000).collect();
        coordinator
            .process_stream(data, |item, _| Ok::<_, StreamError>(*item), None, None)
            .unwrap();

        assert_eq!(cleanup.runs(), 1);
        assert_eq!(logger.count_containing("chunk-level memory pressure"), 1);
        let snapshot = coordinator.snapshot().unwrap();
        assert_eq!(snapshot.cleanup_runs, 1);
        // Chunk-level mitigation has no backpressure pause.
        assert_eq!(snapshot.pressure_pauses, 0);
    }

    #[test]
    fn test_end_to_end_encryption_stream() {
        let cipher = CipherService::from_passphrase("stream passphrase", generate_salt()).unwrap();
        let mut coordinator = calm_coordinator(500, Logger::new());

        let data: Vec<Record> = (0..500).map(Record::synthetic).collect();
        let originals = data.clone();

        let results = coordinator
            .process_stream(data, cipher.sealing_transform(), None, None)
            .unwrap();

        assert_eq!(results.len(), 500);
        for (i, sealed) in results.iter().enumerate() {
            assert_eq!(sealed.id, i as u64);
        }

        // Spot-check a round-trip through the same session.
        let opened = cipher.open_record(&results[123]).unwrap();
        assert_eq!(opened.record, originals[123]);
        assert_eq!(opened.id, 123);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_chunk_count_and_sizes(
            dataset_len in 500usize..1500,
            chunk_size in 1usize..1500,
        ) {
            prop_assume!(chunk_size <= dataset_len);

            let mut coordinator = calm_coordinator(chunk_size, Logger::new());
            let data: Vec<usize> = (0..dataset_len).collect();

            let sizes: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&sizes);
            let mut on_chunk = move |results: &[usize], _: usize, _: usize| {
                sink.lock().unwrap().push(results.len());
            };

            let results = coordinator
                .process_stream(
                    data,
                    |item, _| Ok::<_, StreamError>(*item),
                    Some(&mut on_chunk),
                    None,
                )
                .unwrap();

            let sizes = sizes.lock().unwrap();
            let expected_chunks = (dataset_len + chunk_size - 1) / chunk_size;
            prop_assert_eq!(sizes.len(), expected_chunks);
            prop_assert_eq!(sizes.iter().sum::<usize>(), dataset_len);

            let expected_last = if dataset_len % chunk_size == 0 {
                chunk_size
            } else {
                dataset_len % chunk_size
            };
            prop_assert_eq!(*sizes.last().unwrap(), expected_last);
            prop_assert_eq!(results.len(), dataset_len);
        }
    }
}
