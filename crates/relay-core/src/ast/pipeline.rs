//! Pipeline definitions
//!
//! A pipeline file has a single top-level `pipeline` key:
//!
//! ```yaml
//! version: "1.0"
//! pipeline:
//!   name: build
//!   stages: [build, test]
//!   jobs:
//!     - name: compile
//!       stage: build
//!       script:
//!         - cargo build
//! ```
//!
//! Structural rules (stage ordering, job dependencies) belong to the
//! validation layer; these types only describe shape.

use super::scalar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root of a pipeline definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    /// Optional document format version
    #[serde(
        default,
        deserialize_with = "scalar::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// The pipeline itself (required)
    pub pipeline: Pipeline,
}

/// A pipeline groups jobs into ordered stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline name (required)
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,

    /// Optional description
    #[serde(
        default,
        deserialize_with = "scalar::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Stage names in execution order
    #[serde(default, deserialize_with = "scalar::string_list")]
    pub stages: Vec<String>,

    /// Jobs, each assigned to one stage
    #[serde(default)]
    pub jobs: Vec<Job>,

    /// Arbitrary key-value pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// A single unit of work within a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job name (required, unique within the pipeline)
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,

    /// Stage this job runs in (required)
    #[serde(deserialize_with = "scalar::string")]
    pub stage: String,

    /// Container image to run the script in
    #[serde(
        default,
        deserialize_with = "scalar::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,

    /// Commands, run in order
    #[serde(default, deserialize_with = "scalar::string_list")]
    pub script: Vec<String>,

    /// Names of jobs that must finish first
    #[serde(default, deserialize_with = "scalar::string_list")]
    pub needs: Vec<String>,

    /// Whether a failure of this job fails the pipeline
    #[serde(default)]
    pub allow_failure: bool,
}

impl PipelineDefinition {
    /// Create a definition with no version header
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            version: None,
            pipeline,
        }
    }
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            stages: Vec::new(),
            jobs: Vec::new(),
            metadata: None,
        }
    }

    /// Builder method to append a stage
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stages.push(stage.into());
        self
    }

    /// Builder method to append a job
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Find a job by name
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }

    /// Jobs assigned to `stage`, in declaration order
    pub fn jobs_in_stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a Job> + 'a {
        self.jobs.iter().filter(move |job| job.stage == stage)
    }

    /// Position of `stage` in the stage list
    pub fn stage_index(&self, stage: &str) -> Option<usize> {
        self.stages.iter().position(|s| s == stage)
    }
}

impl Job {
    /// Create a job with an empty script
    pub fn new(name: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: stage.into(),
            image: None,
            script: Vec::new(),
            needs: Vec::new(),
            allow_failure: false,
        }
    }

    /// Builder method to set the image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder method to append a script line
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.script.push(command.into());
        self
    }

    /// Builder method to add a dependency
    pub fn with_need(mut self, job: impl Into<String>) -> Self {
        self.needs.push(job.into());
        self
    }
}
