//! Build automation tasks for the AOP network workspace
//!
//! Currently generates the `aop-query` command reference from the clap
//! definitions so the docs cannot drift from the binary.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for the AOP network tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<aop_query::Cli>();

    let content = format!(
        r#"# aop-query CLI Reference

Generated from the CLI source code on {}.

`aop-query` builds Adverse Outcome Pathway networks from AOP-Wiki RDF and
Bgee, and converts exchange JSON documents into summaries and tables.

## Quick Start

```bash
# Network of AOP 3 with genes, organs and Bgee expression
aop-query build 3 --genes --organs --expression --min-confidence 80 -o aop3.json

# Networks around a molecular initiating event, OECD approved AOPs only
aop-query build -t mie 201 --status "OECD Approved"

# Offline: statistics and tables of an existing document
aop-query summary aop3.json
aop-query convert aop3.json --tables-dir tables -f tsv
```

## Commands

{}

## Environment Variables

- `AOP_WIKI_SPARQL_URL` - AOP-Wiki RDF endpoint (default: `https://aopwiki.rdf.bigcat-bioinformatics.org/sparql`)
- `BGEE_SPARQL_URL` - Bgee endpoint (default: `https://www.bgee.org/sparql/`)
- `AOP_SPARQL_TIMEOUT_SECS` - Request timeout in seconds (default: `30`)
- `AOP_LOG_LEVEL`, `AOP_LOG_FORMAT`, `AOP_LOG_OUTPUT`, `AOP_LOG_DIR`, `AOP_LOG_FILTER` - Logging

Values are also read from a `.env` file in the working directory. Command
line flags take precedence.

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());
    Ok(())
}
