//! Job queue that runs one processing run per upload.
//!
//! Jobs are consumed one at a time by a single worker thread, so two runs
//! never write to the output directories at the same time. Each run executes
//! under `catch_unwind`: a run that panics is reported as a failed job and
//! the worker keeps serving the queue.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde::Serialize;

use crate::config::ExamConfig;
use crate::detect::is_pdf_bytes;
use crate::error::{Error, Result};
use crate::model::ExamDocument;

/// A processing run: config in, persisted document out.
pub type Processor = dyn Fn(&ExamConfig) -> Result<ExamDocument> + Send + Sync;

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The run finished and persisted `questions` questions.
    Completed { questions: usize },
    /// The run failed or panicked.
    Failed { message: String },
}

/// Report for one finished job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub id: u64,
    pub input: PathBuf,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: JobOutcome,
}

impl JobReport {
    /// Whether the run completed.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Completed { .. })
    }
}

struct Job {
    id: u64,
    input: PathBuf,
    submitted_at: DateTime<Utc>,
    reply: Sender<JobReport>,
}

/// Handle to a submitted job.
pub struct JobHandle {
    id: u64,
    reply: Receiver<JobReport>,
}

impl JobHandle {
    /// Id assigned at submission.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the job has finished.
    pub fn wait(self) -> Result<JobReport> {
        self.reply
            .recv()
            .map_err(|_| Error::Job(format!("worker dropped job {}", self.id)))
    }
}

/// Single-worker queue of processing runs.
pub struct JobQueue {
    input_dir: PathBuf,
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    next_id: u64,
}

impl JobQueue {
    /// Start a queue whose jobs run `processor` with `template` pointed at
    /// each job's input.
    pub fn start<F>(input_dir: impl Into<PathBuf>, template: ExamConfig, processor: F) -> Result<Self>
    where
        F: Fn(&ExamConfig) -> Result<ExamDocument> + Send + Sync + 'static,
    {
        let input_dir = input_dir.into();
        fs::create_dir_all(&input_dir)?;

        let processor: Arc<Processor> = Arc::new(processor);
        let (sender, receiver) = unbounded::<Job>();
        let worker = thread::Builder::new()
            .name("unexam-worker".to_string())
            .spawn(move || worker_loop(receiver, template, processor))?;

        Ok(Self {
            input_dir,
            sender: Some(sender),
            worker: Some(worker),
            next_id: 1,
        })
    }

    /// Start a queue that runs the full PDFium pipeline for each job.
    pub fn with_pdfium(input_dir: impl Into<PathBuf>, template: ExamConfig) -> Result<Self> {
        Self::start(input_dir, template, crate::process_file)
    }

    /// Queue a PDF that is already on disk.
    pub fn submit(&mut self, input: impl Into<PathBuf>) -> Result<JobHandle> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| Error::Job("queue is shut down".to_string()))?;

        let id = self.next_id;
        self.next_id += 1;

        let (reply, receiver) = bounded(1);
        let input = input.into();
        log::debug!("Queued job {} for {}", id, input.display());
        sender
            .send(Job {
                id,
                input,
                submitted_at: Utc::now(),
                reply,
            })
            .map_err(|_| Error::Job("worker is not running".to_string()))?;

        Ok(JobHandle {
            id,
            reply: receiver,
        })
    }

    /// Save uploaded bytes into the input directory and queue them.
    ///
    /// Only the final component of `file_name` is used. Bytes without a PDF
    /// header are rejected before anything is written.
    pub fn submit_upload(&mut self, file_name: &str, data: &[u8]) -> Result<JobHandle> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| Error::Other(format!("invalid upload name: {:?}", file_name)))?;
        let path = self.input_dir.join(name);
        fs::write(&path, data)?;
        self.submit(path)
    }

    /// Directory uploads are saved into.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Stop accepting jobs, finish the queued ones and join the worker.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| Error::Job("worker thread panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("{}", e);
        }
    }
}

fn worker_loop(receiver: Receiver<Job>, template: ExamConfig, processor: Arc<Processor>) {
    for job in receiver {
        let config = template.clone().with_input(&job.input);
        log::info!("Job {}: processing {}", job.id, job.input.display());

        let result = panic::catch_unwind(AssertUnwindSafe(|| processor(&config)));
        let outcome = match result {
            Ok(Ok(document)) => JobOutcome::Completed {
                questions: document.question_count(),
            },
            Ok(Err(e)) => JobOutcome::Failed {
                message: e.to_string(),
            },
            Err(payload) => JobOutcome::Failed {
                message: panic_message(payload.as_ref()),
            },
        };
        if let JobOutcome::Failed { message } = &outcome {
            log::warn!("Job {} failed: {}", job.id, message);
        }

        let report = JobReport {
            id: job.id,
            input: job.input,
            submitted_at: job.submitted_at,
            finished_at: Utc::now(),
            outcome,
        };
        // the submitter may have dropped its handle
        let _ = job.reply.send(report);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("processing panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("processing panicked: {}", s)
    } else {
        "processing panicked".to_string()
    }
}
