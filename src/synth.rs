//! Synthesis: validate a stack, render its template, write the assembly.
//!
//! Validation runs before anything touches the filesystem: a stack whose
//! reference graph has a dangling reference or a cycle produces no assembly
//! at all. Everything beyond those two structural checks (CIDR syntax, AMI
//! existence, quota) is the provisioning engine's job at apply time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::ResourceGraph;
use crate::stack::Stack;
use crate::template::Template;

/// Synthesis metadata written next to the template.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    /// Stack name
    pub stack_name: String,
    /// Target region, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Number of resource declarations
    pub resource_count: usize,
    /// Template file name within the assembly
    pub template_file: String,
    /// When synthesis ran
    pub synthesized_at: DateTime<Utc>,
}

/// The files produced by one synthesis run.
#[derive(Debug)]
pub struct Assembly {
    /// Rendered template
    pub template: Template,
    /// Path of the written template
    pub template_path: PathBuf,
    /// Path of the written manifest
    pub manifest_path: PathBuf,
}

/// Renders validated stacks into cloud assemblies.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    out_dir: PathBuf,
    region: Option<String>,
}

impl Synthesizer {
    /// Targets an assembly directory.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Synthesizer {
            out_dir: out_dir.into(),
            region: None,
        }
    }

    /// Records the target region in the manifest. The template itself stays
    /// region-portable; availability zones are deferred intrinsics.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Checks the stack's reference graph: every reference resolves and the
    /// graph is acyclic.
    pub fn validate(stack: &Stack) -> Result<()> {
        ResourceGraph::from_stack(stack).validate()
    }

    /// Renders the template without touching the filesystem. Still runs
    /// validation first.
    pub fn render(stack: &Stack) -> Result<Template> {
        let graph = ResourceGraph::from_stack(stack);
        graph.validate()?;
        let order = graph.provisioning_order()?;
        debug!(
            stack = stack.name(),
            resources = stack.len(),
            "provisioning order: {}",
            order
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Template::from_stack(stack))
    }

    /// Validates, renders, and writes `<stack>.template.json` plus
    /// `manifest.json` into the assembly directory.
    pub fn synthesize(&self, stack: &Stack) -> Result<Assembly> {
        let template = Self::render(stack)?;

        fs::create_dir_all(&self.out_dir).map_err(|source| Error::AssemblyIo {
            path: self.out_dir.clone(),
            source,
        })?;

        let template_file = format!("{}.template.json", stack.name());
        let template_path = self.out_dir.join(&template_file);
        write_file(&template_path, &template.to_json()?)?;

        let manifest = Manifest {
            stack_name: stack.name().to_string(),
            region: self.region.clone(),
            resource_count: stack.len(),
            template_file,
            synthesized_at: Utc::now(),
        };
        let manifest_path = self.out_dir.join("manifest.json");
        write_file(&manifest_path, &serde_json::to_string_pretty(&manifest)?)?;

        info!(
            stack = stack.name(),
            resources = stack.len(),
            path = %template_path.display(),
            "synthesized assembly"
        );

        Ok(Assembly {
            template,
            template_path,
            manifest_path,
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::AssemblyIo {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsics::Value;
    use crate::resource::Resource;

    fn valid_stack() -> Stack {
        let mut stack = Stack::new("demo");
        stack
            .add_resource(Resource::new("vpc", "AWS::EC2::VPC"))
            .unwrap();
        stack
            .add_resource(
                Resource::new("subnet", "AWS::EC2::Subnet")
                    .with_property("VpcId", Value::reference("vpc")),
            )
            .unwrap();
        stack
    }

    #[test]
    fn render_validates_first() {
        let mut stack = Stack::new("broken");
        stack
            .add_resource(
                Resource::new("subnet", "AWS::EC2::Subnet")
                    .with_property("VpcId", Value::reference("vpc")),
            )
            .unwrap();
        assert!(Synthesizer::render(&stack).is_err());
        assert!(Synthesizer::render(&valid_stack()).is_ok());
    }

    #[test]
    fn synthesize_writes_template_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = Synthesizer::new(dir.path()).with_region("ap-northeast-1");
        let assembly = synthesizer.synthesize(&valid_stack()).unwrap();

        assert!(assembly.template_path.exists());
        assert!(assembly.manifest_path.exists());
        assert_eq!(
            assembly.template_path.file_name().unwrap(),
            "demo.template.json"
        );

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&assembly.manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["stack_name"], "demo");
        assert_eq!(manifest["region"], "ap-northeast-1");
        assert_eq!(manifest["resource_count"], 2);
        assert_eq!(manifest["template_file"], "demo.template.json");
    }

    #[test]
    fn invalid_stack_produces_no_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("assembly");
        let synthesizer = Synthesizer::new(&out);

        let mut stack = Stack::new("broken");
        stack
            .add_resource(
                Resource::new("a", "AWS::EC2::Route").with_dependency("b"),
            )
            .unwrap();

        assert!(synthesizer.synthesize(&stack).is_err());
        assert!(!out.exists());
    }
}
