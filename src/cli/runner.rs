//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, GreenhouseCommand, GupyCommand, PandapeCommand};
use crate::config::{Credentials, HarvestConfig};
use crate::error::Result;
use crate::output::{JsonFileSink, PersistenceSink};
use crate::vendors::{
    bizneo, greenhouse, gupy, lever, pandape, recruitee, RunReport, VendorContext, VendorProfile,
};
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
    credentials: Credentials,
}

impl Runner {
    /// Create a runner reading credentials from the environment
    pub fn new(cli: Cli) -> Self {
        Self::with_credentials(cli, Credentials::from_env())
    }

    /// Create a runner with explicit credentials
    pub fn with_credentials(cli: Cli, credentials: Credentials) -> Self {
        Self { cli, credentials }
    }

    /// Effective configuration: the config file (if any) with CLI flags on top
    pub fn config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => HarvestConfig::load(path)?,
            None => HarvestConfig::default(),
        };
        if let Some(dir) = &self.cli.output_dir {
            config.output_dir = Some(dir.clone());
        }
        config.require_complete |= self.cli.require_complete;
        Ok(config)
    }

    /// Run the selected vendor job and print one JSON line per written file
    pub async fn run(&self) -> Result<RunReport> {
        let config = self.config()?;
        let sink: Arc<dyn PersistenceSink> = Arc::new(JsonFileSink::new(config.output_dir()));
        let creds = &self.credentials;

        let report = match &self.cli.command {
            Commands::Bizneo => {
                let ctx = context(bizneo::profile(), &config, sink)?;
                bizneo::run(&ctx, creds).await?
            }
            Commands::Greenhouse { resource } => {
                let ctx = context(greenhouse::profile(), &config, sink)?;
                let resource = match resource {
                    GreenhouseCommand::Applications => greenhouse::Resource::Applications,
                    GreenhouseCommand::Linkedin => greenhouse::Resource::Linkedin,
                };
                greenhouse::run(&ctx, creds, resource).await?
            }
            Commands::Gupy { resource } => {
                let ctx = context(gupy::profile(), &config, sink)?;
                match resource {
                    GupyCommand::JobTemplates => {
                        gupy::run_templates(&ctx, creds, gupy::TemplateKind::Jobs).await?
                    }
                    GupyCommand::EmailTemplates => {
                        gupy::run_templates(&ctx, creds, gupy::TemplateKind::Emails).await?
                    }
                    GupyCommand::Applications => gupy::run_applications(&ctx, creds).await?,
                }
            }
            Commands::Pandape { mode } => {
                let ctx = context(pandape::profile(), &config, sink)?;
                let mode = match mode {
                    PandapeCommand::Data => pandape::Mode::Data,
                    PandapeCommand::Linkedin => pandape::Mode::Linkedin,
                };
                pandape::run(&ctx, creds, mode).await?
            }
            Commands::Recruitee => {
                let ctx = context(recruitee::profile(), &config, sink)?;
                recruitee::run(&ctx, creds).await?
            }
            Commands::Lever { opportunities } => {
                let ctx = context(lever::profile(), &config, sink)?;
                lever::run(&ctx, creds, opportunities).await?
            }
        };

        for file in &report.files {
            println!("{}", serde_json::to_string(file).unwrap_or_default());
        }
        if report.is_complete() {
            info!("Wrote {} files", report.files.len());
        } else {
            warn!("Wrote {} files, some from incomplete harvests", report.files.len());
        }

        Ok(report)
    }
}

fn context(
    profile: VendorProfile,
    config: &HarvestConfig,
    sink: Arc<dyn PersistenceSink>,
) -> Result<VendorContext> {
    VendorContext::new(&profile, config, sink)
}
