use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::inventory::{DiskInventory, ManifestInventory};
use crate::load_config::load_config;
use crate::store::{DirStore, DiskFiles, NoopInvalidator};
use crate::synchronise::Syncer;

/// CLI for asset-sync: reconcile a local asset tree against a bucket.
#[derive(Parser)]
#[clap(
    name = "asset-sync",
    version,
    about = "Reconcile a directory of static build artifacts against an object-storage bucket"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synchronise local assets into the target bucket using the given config file
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config } => {
            let loaded = load_config(config)?;

            let store = DirStore::new(&loaded.bucket_dir);
            let files = DiskFiles;
            let cdn = NoopInvalidator;

            println!("Sync starting...");
            let result = match &loaded.manifest {
                Some(manifest) => {
                    let inventory =
                        ManifestInventory::new(manifest, loaded.sync.assets_prefix.clone());
                    Syncer::new(
                        &loaded.sync,
                        &loaded.source_dir,
                        &inventory,
                        &store,
                        &files,
                        &cdn,
                    )
                    .run()
                    .await
                }
                None => {
                    let inventory =
                        DiskInventory::new(&loaded.source_dir, loaded.sync.assets_prefix.clone());
                    Syncer::new(
                        &loaded.sync,
                        &loaded.source_dir,
                        &inventory,
                        &store,
                        &files,
                        &cdn,
                    )
                    .run()
                    .await
                }
            };

            match result {
                Ok(report) => {
                    println!("Sync complete.\nReport:");
                    println!("{report:#?}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Sync failed: {e}");
                    Err(e.into())
                }
            }
        }
    }
}
