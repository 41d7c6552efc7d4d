/*
    Check a template alignment before using it with nast_align
        every record in FASTA format
        every row the same length
        report number of rows and columns

    Input
        template alignment
        optional output for the ungapped templates, the database searched by vsearch
*/

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use nast_core::TemplateAlignment;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Template alignment in FASTA format
    #[arg(short='i', long="infile", required = true)]
    input_alignment: PathBuf,
    /// Write the templates without gaps in FASTA format
    #[arg(long="ungapped")]
    ungapped: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    check_template(&cli)
}

fn check_template(cli: &Cli) -> anyhow::Result<()> {
    let template = match TemplateAlignment::from_fasta(&cli.input_alignment) {
        Ok(template) => template,
        Err(err) => {
            error!("Alignment failed: {}", err);
            return Err(err).context("template alignment check failed");
        }
    };
    info!("Alignment complies requirements {:?}", cli.input_alignment);
    println!("{}\t{}\t{}", cli.input_alignment.display(), template.len(), template.ncols());

    if let Some(path) = &cli.ungapped {
        let file = File::create(path).with_context(|| format!("cannot create {:?}", path))?;
        template.write_ungapped(file)?;
        info!("Ungapped templates written to {:?}", path);
    }
    Ok(())
}
