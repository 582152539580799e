//! Program descriptor (one JSON file per tool).
//!
//! JSON shape:
//! {
//!   "program": "nmap",                  // unique id
//!   "input": [["ip"], ["domain"]],      // alternative requirement bundles
//!   "output": ["port", "service"],      // parameters the tool produces
//!   "commands": ["nmap -p- {ip}"],      // carried, never run
//!   "comments": ["full port scan"],
//!   "filter": "open",
//!   "regex": {"port": "(\\d+)/tcp"}     // name -> pattern
//! }
//!
//! Every key but `program` is optional.

use crate::Result;
use crate::graph::{Metadata, ParamSet, Program};
use anyhow::{Context, bail};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw descriptor shape as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramSpec {
    #[serde(default)]
    pub program: String,

    #[serde(default)]
    pub input: Vec<Vec<String>>,

    #[serde(default)]
    pub output: Vec<String>,

    #[serde(default)]
    pub commands: Vec<String>,

    #[serde(default)]
    pub comments: Vec<String>,

    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub regex: BTreeMap<String, String>,
}

impl ProgramSpec {
    /// Check one descriptor and turn it into a graph program.
    ///
    /// - id must be non-empty
    /// - parameter names must be non-empty
    /// - every regex must compile
    pub fn validate_and_build(self) -> Result<Program> {
        let id = self.program.trim().to_string();
        if id.is_empty() {
            bail!("descriptor has an empty \"program\" id");
        }

        let mut requirement_sets = Vec::with_capacity(self.input.len());
        for (i, bundle) in self.input.into_iter().enumerate() {
            requirement_sets.push(
                param_set(bundle).with_context(|| format!("program {}: input bundle {}", id, i))?,
            );
        }
        let outputs = param_set(self.output).with_context(|| format!("program {}: output", id))?;

        for (name, pattern) in &self.regex {
            Regex::new(pattern)
                .with_context(|| format!("program {}: regex {:?} does not compile", id, name))?;
        }

        let metadata = Metadata {
            commands: self.commands,
            comments: self.comments,
            filter: self.filter,
            regex: self.regex,
        };
        Ok(Program::new(id, requirement_sets, outputs).with_metadata(metadata))
    }
}

fn param_set(names: Vec<String>) -> Result<ParamSet> {
    let mut set = ParamSet::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            bail!("empty parameter name");
        }
        set.insert(name.to_string());
    }
    Ok(set)
}
