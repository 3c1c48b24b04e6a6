//! Generate command implementation

use std::path::PathBuf;

use agiros_bloom_core::BranchArgument;
use agiros_bloom_generators::{
    DebianGenerator, Generator, GeneratorSettings, ReleaseHistory, RpmGenerator,
    SubstitutionRecord,
};
use agiros_bloom_package::scan_workspace;
use agiros_bloom_rosdep::DependencyResolver;
use agiros_bloom_rosdistro::DescriptorSource;
use clap::ValueEnum;
use color_eyre::eyre::{eyre, Context, Result};
use serde::Serialize;
use tracing::info;

use super::context::ReleaseContext;
use super::prompt::retry_prompt;

/// Packaging backend selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Debian,
    Rpm,
}

/// Output format of generated records
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Everything generated for one package
#[derive(Debug, Serialize)]
struct GeneratedPackage {
    package: String,
    generator: &'static str,
    substitutions: SubstitutionRecord,
    branches: Vec<BranchArgument>,
    release_tag: String,
}

/// Generate command implementation
pub struct GenerateCommand {
    config_path: PathBuf,
    backend: BackendArg,
    package_path: PathBuf,
    os_version: Option<String>,
    increment: u32,
    format: OutputFormat,
    interactive: bool,
}

impl GenerateCommand {
    pub fn new(config_path: PathBuf, backend: BackendArg, package_path: PathBuf) -> Self {
        Self {
            config_path,
            backend,
            package_path,
            os_version: None,
            increment: 0,
            format: OutputFormat::Yaml,
            interactive: true,
        }
    }

    pub fn with_os_version(mut self, os_version: Option<String>) -> Self {
        self.os_version = os_version;
        self
    }

    pub fn with_increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn execute(&self) -> Result<()> {
        let context = ReleaseContext::load(&self.config_path)?;
        let config = &context.config;
        let os_version = self.os_version.clone().unwrap_or_else(|| config.os_version.clone());

        let distribution = context
            .index
            .distribution(&config.rosdistro)
            .context("Failed to load distribution")?;

        info!("Scanning {} for packages", self.package_path.display());
        let packages = scan_workspace(&self.package_path).context("Failed to scan packages")?;
        if packages.is_empty() {
            return Err(eyre!("No packages found under {}", self.package_path.display()));
        }

        let mut settings = GeneratorSettings::new(&config.os_name, distribution)
            .with_targets(config.target_os_versions.clone())
            .with_skip_keys(config.skip_keys.iter().cloned())
            .with_peers(packages.iter().map(|p| p.name.clone()));
        if let Some(prefix) = &config.install_prefix {
            settings = settings.with_install_prefix(prefix);
        }

        let prompt = retry_prompt(self.interactive);
        let dependencies =
            DependencyResolver::new(&context.resolver, &context.refresher, prompt.as_ref())
                .with_policy(context.policy());

        let generator: Box<dyn Generator + '_> = match self.backend {
            BackendArg::Debian => Box::new(DebianGenerator::new(settings, dependencies)),
            BackendArg::Rpm => Box::new(RpmGenerator::new(settings, dependencies)),
        };

        let history = ReleaseHistory::new();
        let mut generated = Vec::with_capacity(packages.len());
        for package in &packages {
            let source_branch = format!("release/{}/{}", config.rosdistro, package.name);
            let substitutions = generator
                .generate(package, &os_version, &history, self.increment)
                .with_context(|| format!("Failed to generate {}", package.name))?;

            generated.push(GeneratedPackage {
                package: package.name.clone(),
                generator: generator.title(),
                substitutions,
                branches: generator.branching_arguments(package, &source_branch),
                release_tag: generator.release_tag(package, self.increment),
            });
        }

        let output = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&generated)?,
            OutputFormat::Yaml => serde_yaml::to_string(&generated)?,
        };
        println!("{output}");
        Ok(())
    }
}
