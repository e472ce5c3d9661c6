//! Job list bookkeeping for the viewer's job tracking capability.

use thiserror::Error;

use crate::regions::Region;

/// A region picked into the working list, with its metadata copied at add time.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub hours: Option<f64>,
    pub price: Option<f64>,
    pub components: Vec<String>,
}

impl Job {
    fn snapshot(region: &Region) -> Self {
        Self {
            id: region.id.clone(),
            name: region.name.clone(),
            hours: region.hours,
            price: region.price,
            components: region.components.clone(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("{name} is already in the job list.")]
    Duplicate { id: String, name: String },
}

/// Jobs in insertion order, unique by region id.
#[derive(Debug, Clone, Default)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot of `region`. Rejected without change if the id is already listed.
    pub fn add(&mut self, region: &Region) -> Result<(), JobError> {
        if self.contains(&region.id) {
            log::warn!("duplicate job add for '{}'", region.id);
            return Err(JobError::Duplicate {
                id: region.id.clone(),
                name: region.name.clone(),
            });
        }
        self.jobs.push(Job::snapshot(region));
        log::debug!("job added: {} ({} total)", region.id, self.jobs.len());
        Ok(())
    }

    /// Removes the job for `id`; a missing id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Job> {
        let pos = self.jobs.iter().position(|j| j.id == id)?;
        let job = self.jobs.remove(pos);
        log::debug!("job removed: {id}");
        Some(job)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.jobs.iter().any(|j| j.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn total_hours(&self) -> f64 {
        self.jobs.iter().filter_map(|j| j.hours).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.jobs.iter().filter_map(|j| j.price).sum()
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
