use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::release::ReleaseOutcome;

/// Values published at the end of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    pub version: String,
    pub tagname: String,
}

impl RunOutputs {
    /// `key=value` lines, one per output
    pub fn lines(&self) -> String {
        format!("version={}\ntagname={}\n", self.version, self.tagname)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.lines().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Append to a step output file such as `$GITHUB_OUTPUT`
    pub fn append_to_file(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_to(file)
    }
}

impl From<&ReleaseOutcome> for RunOutputs {
    fn from(outcome: &ReleaseOutcome) -> Self {
        RunOutputs {
            version: outcome.version.to_string(),
            tagname: outcome.tag_name.clone(),
        }
    }
}
