use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;
use tracing::debug;

use crate::{travel_matrices::TravelMatrices, travel_matrix_provider::TravelMatrixProvider};

const CACHE_FOLDER_ENV_VAR: &str = "DINNER_CACHE_FOLDER";

pub trait MatricesCache {
    fn cache<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
        matrices: &TravelMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;

    fn get_cached<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
    ) -> Result<Option<TravelMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;
}

pub struct NoCache;

impl MatricesCache for NoCache {
    fn cache<P>(
        &self,
        _provider: &TravelMatrixProvider,
        _points: &[P],
        _matrices: &TravelMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(())
    }

    fn get_cached<P>(
        &self,
        _provider: &TravelMatrixProvider,
        _points: &[P],
    ) -> Result<Option<TravelMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(None)
    }
}

/// JSON files named after a hash of the points and the provider. Disabled when
/// no folder is configured.
pub struct FileCache {
    folder: Option<PathBuf>,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: Some(folder.into()),
        }
    }

    pub fn from_env() -> Self {
        Self {
            folder: std::env::var(CACHE_FOLDER_ENV_VAR).ok().map(PathBuf::from),
        }
    }

    fn folder(&self) -> Result<Option<&Path>, anyhow::Error> {
        let Some(folder) = self.folder.as_deref() else {
            return Ok(None);
        };

        if !folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                folder.display()
            ));
        }

        Ok(Some(folder))
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::from_env()
    }
}

fn hash_points<H, P>(points: &[P], hasher: &mut H)
where
    H: Hasher,
    for<'a> &'a P: Into<geo_types::Point>,
{
    points.len().hash(hasher);
    for point in points {
        let point = point.into();
        hasher.write_u64(point.x().to_bits());
        hasher.write_u64(point.y().to_bits());
    }
}

fn get_filename<P>(points: &[P], provider: &TravelMatrixProvider) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let mut hasher = FxHasher64::default();

    hash_points(points, &mut hasher);
    provider.hash(&mut hasher);

    format!("{:016x}.json", hasher.finish())
}

impl MatricesCache for FileCache {
    fn cache<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
        matrices: &TravelMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let Some(folder) = self.folder()? else {
            return Ok(());
        };

        let path = folder.join(get_filename(points, provider));
        let file = std::fs::File::create(&path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, &matrices)?;
        writer.flush()?;

        debug!("Cached travel matrices in {}", path.display());

        Ok(())
    }

    fn get_cached<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
    ) -> Result<Option<TravelMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let Some(folder) = self.folder()? else {
            return Ok(None);
        };

        let path = folder.join(get_filename(points, provider));

        if !path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(&path)?;
        let matrices: TravelMatrices = serde_json::from_reader(std::io::BufReader::new(file))?;

        debug!("Loaded travel matrices from {}", path.display());

        Ok(Some(matrices))
    }
}
