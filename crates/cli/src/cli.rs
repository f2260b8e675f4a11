//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use charon_core::{
    PipelineContext, build_plan,
    pipeline::{clean, generate, postprocess, verify},
    plan::{find_plan, parse_build_plans},
};

#[derive(Parser)]
#[command(name = "charon-fonts")]
#[command(about = "Build and post-process the Charon Sans font family")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Build plan name; all plans when omitted.
    #[arg(short, long)]
    pub plan: Option<String>,
    /// Upstream checkout with package.json and the build plans file.
    #[arg(long, default_value = "sources")]
    pub source_dir: PathBuf,
    /// Root for raw/, fonts/, and reports/.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Only ship Regular, Bold, Italic, and Bold Italic.
    #[arg(long)]
    pub ribbi_only: bool,
    /// Skip `npm ci` even when node_modules is missing.
    #[arg(long)]
    pub skip_npm_install: bool,
    /// External QA command to run over each output directory.
    #[arg(long)]
    pub linter: Option<String>,
}

impl BuildArgs {
    fn contexts(&self) -> Result<Vec<PipelineContext>> {
        let plans_file = self.source_dir.join("private-build-plans.toml");
        let plans = parse_build_plans(&plans_file)?;
        let selected = match &self.plan {
            Some(name) => vec![find_plan(&plans, name)?],
            None => plans,
        };

        Ok(selected
            .into_iter()
            .map(|plan| {
                let mut ctx = PipelineContext::new(
                    self.source_dir.clone(),
                    self.output_dir.clone(),
                    plan,
                );
                ctx.ribbi_only = self.ribbi_only;
                ctx.skip_npm_install = self.skip_npm_install;
                ctx.linter = self.linter.clone();
                ctx
            })
            .collect())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full pipeline: generate, post-process, verify.
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Run the upstream generator and stage raw fonts.
    Generate {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Fix staged raw fonts and place them for distribution.
    Postprocess {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Verify output fonts and write compliance reports.
    Check {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Remove staged and shipped fonts.
    Clean {
        #[command(flatten)]
        args: BuildArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { args } => {
                for ctx in args.contexts()? {
                    build_plan(&ctx)?;
                }
            }
            Commands::Generate { args } => {
                for ctx in args.contexts()? {
                    generate(&ctx)?;
                }
            }
            Commands::Postprocess { args } => {
                for ctx in args.contexts()? {
                    postprocess(&ctx)?;
                }
            }
            Commands::Check { args } => {
                for ctx in args.contexts()? {
                    verify(&ctx)?;
                }
            }
            Commands::Clean { args } => {
                for ctx in args.contexts()? {
                    clean(&ctx)?;
                }
            }
        }
        Ok(())
    }
}
