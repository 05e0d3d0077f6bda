use skirmish_runtime::setup_logging;

#[test]
fn test_file_logging_and_single_install() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_dir = dir.path().join("logs");

    let guard = setup_logging(Some(&log_dir)).expect("first install succeeds");
    assert!(guard.is_some());
    tracing::warn!("written through the file layer");
    drop(guard);

    assert!(log_dir.join("skirmish.log").is_file());

    // The global subscriber can only be installed once per process.
    assert!(setup_logging(None).is_err());
}
