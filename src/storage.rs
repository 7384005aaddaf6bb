use crate::generator::GeneratedSchedule;
use anyhow::{bail, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un planning ; chaque ligne doit couvrir tout le mois.
    fn load(&self) -> anyhow::Result<GeneratedSchedule>;
    /// Sauvegarde de manière atomique.
    fn save(&self, schedule: &GeneratedSchedule) -> anyhow::Result<()>;
}

/// Planning mensuel dans un fichier JSON (format `GeneratedSchedule`).
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Le fichier a pu être retouché : on refuse un mois tronqué ou allongé.
    fn check_shape(&self, generated: &GeneratedSchedule) -> anyhow::Result<()> {
        let days = generated.days_in_month;
        if let Some(demand) = &generated.demand {
            demand
                .validate(days)
                .with_context(|| format!("schedule {}: invalid demand", self.path.display()))?;
        }
        if let Some(row) = generated.schedule.rows().iter().find(|r| r.days.len() != days) {
            bail!(
                "schedule {}: row {} has {} days, expected {days}",
                self.path.display(),
                row.employee,
                row.days.len()
            );
        }
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<GeneratedSchedule> {
        let data = fs::read(&self.path)
            .with_context(|| format!("reading schedule {}", self.path.display()))?;
        let generated: GeneratedSchedule = serde_json::from_slice(&data).with_context(|| {
            format!(
                "parsing schedule {} (expected a generated month)",
                self.path.display()
            )
        })?;
        self.check_shape(&generated)?;
        Ok(generated)
    }

    fn save(&self, schedule: &GeneratedSchedule) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(schedule)?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file next to {}", self.path.display()))?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("writing schedule {}", self.path.display()))?;
        Ok(())
    }
}
