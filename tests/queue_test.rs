//! Job queue tests with an in-memory processing run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use unexam::{
    parse_with_backend, Error, ExamConfig, JobOutcome, JobQueue, MemoryBackend, MemoryPage,
    OutputStore, PageSize,
};

fn booklet(questions: u32) -> MemoryBackend {
    let mut page = MemoryPage::blank(PageSize::a4(), 1.0);
    for i in 0..questions {
        let top = 100.0 + i as f32 * 60.0;
        page = page
            .with_line(&format!("Q #{} Multiple Select Type", i + 1), top, top + 12.0)
            .with_line("Award: 2", top + 20.0, top + 32.0);
    }
    MemoryBackend::new().with_page(page)
}

#[test]
fn test_jobs_run_in_submission_order() {
    let dir = tempfile::tempdir().unwrap();
    let template = ExamConfig::default()
        .with_image_dir(dir.path().join("output_images"))
        .with_data_dir(dir.path().join("data"));
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&runs);
    let mut queue = JobQueue::start(dir.path().join("input_pdf"), template.clone(), move |config| {
        let n = counter.fetch_add(1, Ordering::SeqCst) as u32 + 1;
        if !config.input.is_file() {
            return Err(Error::InputNotFound(config.input.clone()));
        }
        let output = parse_with_backend(&booklet(n), config)?;
        OutputStore::new(config).persist(output)
    })
    .unwrap();

    let first = queue.submit_upload("first.pdf", b"%PDF-1.7").unwrap();
    let second = queue.submit_upload("second.pdf", b"%PDF-1.7").unwrap();
    let missing = queue.submit(dir.path().join("nope.pdf")).unwrap();

    assert_eq!(
        first.wait().unwrap().outcome,
        JobOutcome::Completed { questions: 1 }
    );
    assert_eq!(
        second.wait().unwrap().outcome,
        JobOutcome::Completed { questions: 2 }
    );
    assert!(matches!(
        missing.wait().unwrap().outcome,
        JobOutcome::Failed { .. }
    ));
    queue.shutdown().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 3);

    // the failed third run left the second run's output in place
    let persisted = OutputStore::new(&template).load().unwrap();
    assert_eq!(persisted.question_count(), 2);
    assert!(template.image_dir.join("q_2.png").is_file());
}

#[test]
fn test_worker_survives_panicking_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut queue = JobQueue::start(dir.path(), ExamConfig::default(), |_| {
        panic!("worker panic")
    })
    .unwrap();
    let report = queue.submit(dir.path().join("a.pdf")).unwrap().wait().unwrap();
    assert!(!report.is_success());

    let report = queue.submit(dir.path().join("b.pdf")).unwrap().wait().unwrap();
    assert_eq!(report.id, 2);
    queue.shutdown().unwrap();
}
