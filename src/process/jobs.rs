use std::fmt;

use super::{wait_pid, JobError, Pid};
use crate::core::state::ExitStatus;

pub const DEFAULT_MAX_JOBS: usize = 40;

#[derive(Debug, Clone, Copy)]
struct Job {
    pid: Pid,
    finished: Option<ExitStatus>,
}

/// Notice for a background job that has been reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    pub pid: Pid,
    pub status: ExitStatus,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background pid {} is done: {}", self.pid, self.status)
    }
}

/// Background children that have not been reported yet, in launch order.
pub struct JobRegistry {
    jobs: Vec<Job>,
    capacity: usize,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_JOBS)
    }
}

impl JobRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.jobs.iter().any(|job| job.pid == pid)
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.jobs.iter().map(|job| job.pid).collect()
    }

    /// Checked before forking so a full registry never leaves an untracked
    /// child behind.
    pub fn ensure_capacity(&self) -> Result<(), JobError> {
        if self.jobs.len() >= self.capacity {
            return Err(JobError::Capacity(self.capacity));
        }
        Ok(())
    }

    /// Track a new background child. `finished` carries a status that was
    /// already collected at launch so it still gets reported exactly once.
    pub fn register(&mut self, pid: Pid, finished: Option<ExitStatus>) -> Result<(), JobError> {
        if self.contains(pid) {
            return Err(JobError::Duplicate(pid));
        }
        self.ensure_capacity()?;
        self.jobs.push(Job { pid, finished });
        log::debug!("tracking background job {} ({} active)", pid, self.len());
        Ok(())
    }

    /// Non-blocking sweep over every tracked job. Finished jobs are removed
    /// and returned in launch order.
    pub fn poll(&mut self) -> Vec<JobReport> {
        let mut reports = Vec::new();
        self.jobs.retain_mut(|job| {
            if job.finished.is_none() {
                match wait_pid(job.pid, true) {
                    Ok(status) => job.finished = status,
                    Err(e) => {
                        // ECHILD: somebody else reaped it; nothing left to report
                        log::warn!("dropping background job {}: {}", job.pid, e);
                        return false;
                    }
                }
            }
            match job.finished {
                Some(status) => {
                    reports.push(JobReport {
                        pid: job.pid,
                        status,
                    });
                    false
                }
                None => true,
            }
        });
        reports
    }

    /// Send `SIGTERM` to every tracked job and reap them all.
    pub fn terminate_all(&mut self) -> Vec<JobReport> {
        let mut reports = Vec::with_capacity(self.jobs.len());
        for job in self.jobs.drain(..) {
            let status = match job.finished {
                Some(status) => Some(status),
                None => {
                    unsafe {
                        libc::kill(job.pid, libc::SIGTERM);
                    }
                    match wait_pid(job.pid, false) {
                        Ok(status) => status,
                        Err(e) if e.raw_os_error() == Some(libc::ECHILD) => None,
                        Err(e) => {
                            log::warn!("could not reap background job {}: {}", job.pid, e);
                            None
                        }
                    }
                }
            };
            if let Some(status) = status {
                log::debug!("terminated background job {}: {}", job.pid, status);
                reports.push(JobReport {
                    pid: job.pid,
                    status,
                });
            }
        }
        reports
    }
}

impl fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRegistry")
            .field("pids", &self.pids())
            .field("capacity", &self.capacity)
            .finish()
    }
}
