//! OSRM dataset preparation (download + preprocess), for local routing
//! servers used in development and integration tests.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "north-america/us/nevada".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!(
            "https://download.geofabrik.de/{}-latest.osm.pbf",
            self.path.trim_end_matches('/')
        )
    }
}

/// Routing profile shipped with the OSRM image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsrmProfile {
    Car,
    Bicycle,
    Foot,
}

impl OsrmProfile {
    /// Profile name as used in `/route/v1/{profile}` URLs.
    pub fn name(self) -> &'static str {
        match self {
            OsrmProfile::Car => "car",
            OsrmProfile::Bicycle => "bicycle",
            OsrmProfile::Foot => "foot",
        }
    }

    fn lua_path(self) -> String {
        format!("/opt/{}.lua", self.name())
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    pub profile: OsrmProfile,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile: OsrmProfile::Car,
        }
    }

    pub fn with_profile(mut self, profile: OsrmProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Each profile gets its own directory; extracted graphs differ.
    fn data_dir(&self) -> io::Result<PathBuf> {
        let data_root = if self.data_root.is_absolute() {
            self.data_root.clone()
        } else {
            std::env::current_dir()?.join(&self.data_root)
        };
        Ok(data_root.join(self.region.name()).join(self.profile.name()))
    }
}

/// A region extract prepared for `osrm-routed --algorithm mld`.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
    pub profile: OsrmProfile,
}

#[derive(Debug)]
pub enum OsrmDataError {
    Io(io::Error),
    Http(reqwest::Error),
    ProcessFailure(String),
}

impl fmt::Display for OsrmDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsrmDataError::Io(err) => write!(f, "dataset I/O failed: {}", err),
            OsrmDataError::Http(err) => write!(f, "extract download failed: {}", err),
            OsrmDataError::ProcessFailure(msg) => write!(f, "OSRM preprocessing failed: {}", msg),
        }
    }
}

impl std::error::Error for OsrmDataError {}

impl From<io::Error> for OsrmDataError {
    fn from(err: io::Error) -> Self {
        OsrmDataError::Io(err)
    }
}

impl From<reqwest::Error> for OsrmDataError {
    fn from(err: reqwest::Error) -> Self {
        OsrmDataError::Http(err)
    }
}

impl OsrmDataset {
    /// Downloads and preprocesses whatever is missing, then returns the
    /// dataset paths. Steps already done are skipped.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_dir = config.data_dir()?;
        fs::create_dir_all(&data_dir)?;

        let region_name = config.region.name();
        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region_name));
        if !pbf_path.exists() {
            tracing::info!("Downloading {}", config.region.url());
            download_pbf(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", region_name));
        if !osrm_base.exists() {
            tracing::info!("Extracting {} with the {} profile", region_name, config.profile.name());
            run_docker(
                &[
                    "osrm-extract",
                    "-p",
                    &config.profile.lua_path(),
                    &container_path(&pbf_path),
                ],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            run_docker(&["osrm-partition", &container_path(&osrm_base)], &data_dir)?;
            run_docker(&["osrm-customize", &container_path(&osrm_base)], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
            profile: config.profile,
        })
    }

    /// Path of the `.osrm` base as seen inside a container mounting
    /// `data_dir` at `/data`.
    pub fn container_osrm_path(&self) -> String {
        container_path(&self.osrm_base)
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    response.copy_to(&mut writer)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|ext| osrm_base.with_extension(ext).exists())
        && osrm_base.exists()
}

fn run_docker(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "`{}` exited with status {}",
            args.first().copied().unwrap_or("docker"),
            status
        )))
    }
}

fn container_path(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    format!("/data/{}", name)
}
