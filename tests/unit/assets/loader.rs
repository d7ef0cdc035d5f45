use super::*;

const OK: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#;

#[test]
fn inline_results_wait_in_queue_until_drained() {
    let mut loader = ArtLoader::new(DecodeMode::Inline);
    loader.submit(3, Arc::from(OK));
    loader.submit(5, Arc::from("<svg"));
    assert_eq!(loader.pending(), 2);

    let events = loader.drain();
    assert_eq!(loader.pending(), 0);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].slot, 3);
    assert!(events[0].result.is_ok());
    assert_eq!(events[1].slot, 5);
    assert!(events[1].result.is_err());
    assert!(loader.drain().is_empty());
}

#[test]
fn background_jobs_all_report_back() {
    let mut loader = ArtLoader::new(DecodeMode::Background);
    for slot in 0..8 {
        loader.submit(slot, Arc::from(OK));
    }
    let mut events = loader.wait().unwrap();
    assert_eq!(loader.pending(), 0);
    events.sort_by_key(|e| e.slot);
    let slots: Vec<usize> = events.iter().map(|e| e.slot).collect();
    assert_eq!(slots, (0..8).collect::<Vec<_>>());
    assert!(events.iter().all(|e| e.result.is_ok()));
}

#[test]
fn wait_with_nothing_pending_returns_immediately() {
    let mut loader = ArtLoader::new(DecodeMode::Background);
    assert!(loader.wait().unwrap().is_empty());
}
