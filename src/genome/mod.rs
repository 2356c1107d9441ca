use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;

/// Reference sequence for one accession, held only while its job is
/// being processed.
pub struct Genome {
    bases: Vec<u8>,
}

impl Genome {
    pub fn new(bases: Vec<u8>) -> Self {
        Self { bases }
    }

    /// Build a genome from the raw text a lookup tool printed: whitespace
    /// is stripped and bases are upcased so window checks are
    /// well-defined.
    pub fn from_tool_output(output: &str) -> Result<Self> {
        let bases: Vec<u8> = output
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| b.to_ascii_uppercase())
            .collect();
        if bases.is_empty() {
            bail!("Lookup returned an empty sequence");
        }
        Ok(Self { bases })
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    /// Bounds-checked window access.
    pub fn window(&self, start: usize, length: usize) -> Option<&[u8]> {
        self.bases.get(start..start + length)
    }
}

/// Where reference genomes come from. Production uses [`BlastDb`]; tests
/// substitute an in-memory source.
pub trait GenomeSource {
    fn fetch(&self, accession: &str) -> Result<Genome>;
}

/// Fetches sequences from a local BLAST database via `blastdbcmd`.
pub struct BlastDb {
    command: String,
    database: String,
    database_dir: Option<PathBuf>,
}

impl BlastDb {
    pub fn new(command: String, database: String, database_dir: Option<PathBuf>) -> Self {
        Self {
            command,
            database,
            database_dir,
        }
    }

    /// Verify the lookup tool is runnable before entering the job loop.
    pub fn check(&self) -> Result<()> {
        Command::new(&self.command)
            .arg("-version")
            .output()
            .with_context(|| {
                format!(
                    "{} not found. Please install the NCBI BLAST+ toolkit and ensure it's in your PATH",
                    self.command
                )
            })
            .map(|_| ())
    }
}

impl GenomeSource for BlastDb {
    fn fetch(&self, accession: &str) -> Result<Genome> {
        let mut command = Command::new(&self.command);
        command.args(["-entry", accession, "-db", &self.database, "-outfmt", "%s"]);
        if let Some(dir) = &self.database_dir {
            command.current_dir(dir);
        }
        let output = command
            .output()
            .with_context(|| format!("Failed to run {} for {}", self.command, accession))?;
        if !output.status.success() {
            bail!(
                "{} failed for {}: {}",
                self.command,
                accession,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let text = String::from_utf8(output.stdout)
            .with_context(|| format!("{} returned non-UTF8 output for {}", self.command, accession))?;
        Genome::from_tool_output(&text)
            .with_context(|| format!("No usable sequence for {}", accession))
    }
}
