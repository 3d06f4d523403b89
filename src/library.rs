// Photo library module
// Asset queries and a directory-backed stand-in for the device photo library

use crate::error::LibraryError;
use crate::image_loader::format_from_path;
use image::{DynamicImage, ImageFormat};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of media an asset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Other,
}

/// Which assets a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFilter {
    Images,
    All,
}

/// Creation-time ordering of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetQuery {
    pub filter: MediaFilter,
    pub order: SortOrder,
}

impl AssetQuery {
    /// Images only, most recently created first
    pub fn latest_images() -> Self {
        Self {
            filter: MediaFilter::Images,
            order: SortOrder::NewestFirst,
        }
    }

    fn accepts(&self, media_type: MediaType) -> bool {
        match self.filter {
            MediaFilter::Images => media_type == MediaType::Image,
            MediaFilter::All => true,
        }
    }
}

/// One item in the photo library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Stable identifier other apps use to find the asset
    pub local_identifier: String,
    pub media_type: MediaType,
    pub created: SystemTime,
}

/// Read access to a photo library
pub trait AssetStore {
    /// All assets matching `query`, in the query's order
    fn fetch_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, LibraryError>;
}

/// Sort assets by creation time, ties broken by identifier
pub fn sort_assets(assets: &mut [Asset], order: SortOrder) {
    assets.sort_by(|a, b| {
        let ordering = a
            .created
            .cmp(&b.created)
            .then_with(|| a.local_identifier.cmp(&b.local_identifier));
        match order {
            SortOrder::OldestFirst => ordering,
            SortOrder::NewestFirst => ordering.reverse(),
        }
    });
}

/// A photo library kept as files in one directory.
///
/// The file name is the asset's local identifier.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    /// Use an existing directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(LibraryError::NotFound(root));
        }
        Ok(Self { root })
    }

    /// Use `root`, creating it first if needed
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| LibraryError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `image` into the library as PNG and report the outcome to
    /// `on_complete` exactly once
    pub fn save_image<F>(&self, image: &DynamicImage, on_complete: F)
    where
        F: FnOnce(Result<(), LibraryError>),
    {
        let outcome = self.write_png(image).map(|path| {
            info!("Saved image to {}", path.display());
        });
        on_complete(outcome);
    }

    fn write_png(&self, image: &DynamicImage) -> Result<PathBuf, LibraryError> {
        if !self.root.is_dir() {
            return Err(LibraryError::NotFound(self.root.clone()));
        }
        let path = self.unused_path();
        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }

    fn unused_path(&self) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut path = self.root.join(format!("IMG_{stamp}.png"));
        let mut suffix = 1;
        while path.exists() {
            path = self.root.join(format!("IMG_{stamp}_{suffix}.png"));
            suffix += 1;
        }
        path
    }

    /// Asset for one directory entry; `None` for anything but a regular file
    fn asset_for(entry: &fs::DirEntry) -> Result<Option<Asset>, LibraryError> {
        let path = entry.path();
        // Does not follow symlinks
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            // Removed since the directory was listed
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LibraryError::io(&path, e)),
        };
        if !metadata.is_file() {
            return Ok(None);
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        // Some filesystems do not record birth time
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(|e| LibraryError::io(&path, e))?;
        let media_type = match format_from_path(&path) {
            Some(_) => MediaType::Image,
            None => MediaType::Other,
        };
        Ok(Some(Asset {
            local_identifier: name.to_string(),
            media_type,
            created,
        }))
    }
}

impl AssetStore for DirectoryLibrary {
    fn fetch_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, LibraryError> {
        let entries = fs::read_dir(&self.root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LibraryError::NotFound(self.root.clone()),
            _ => LibraryError::io(&self.root, e),
        })?;

        let mut assets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LibraryError::io(&self.root, e))?;
            if let Some(asset) = Self::asset_for(&entry)? {
                if query.accepts(asset.media_type) {
                    assets.push(asset);
                }
            }
        }
        sort_assets(&mut assets, query.order);

        debug!(
            "Library query {:?} in {} matched {} assets",
            query,
            self.root.display(),
            assets.len()
        );
        Ok(assets)
    }
}
