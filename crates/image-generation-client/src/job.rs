//! Job handles, per-query status and terminal poll outcomes.

use std::fmt;

/// Provider-assigned identifier of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobHandle {
    /// FusionBrain: the pipeline the job runs on plus the run uuid.
    Pipeline { pipeline_id: String, uuid: String },
    /// Kandinsky text2image task.
    Task { task_id: String },
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobHandle::Pipeline { pipeline_id, uuid } => write!(f, "{}/{}", pipeline_id, uuid),
            JobHandle::Task { task_id } => write!(f, "{}", task_id),
        }
    }
}

/// One generated image reference in a completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Url(String),
    /// Base64-encoded image bytes.
    Inline(String),
}

impl Artifact {
    /// Providers mix download links and base64 payloads in the same field; links are recognised by scheme.
    pub fn from_file_entry(entry: String) -> Self {
        if entry.starts_with("https://") || entry.starts_with("http://") {
            Artifact::Url(entry)
        } else {
            Artifact::Inline(entry)
        }
    }
}

/// Result of a single status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    Pending,
    Done(Vec<Artifact>),
    Failed(String),
}

/// Terminal state of the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Done(Vec<Artifact>),
    Failed(String),
    TimedOut { attempts: u32 },
}
