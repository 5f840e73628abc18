//! Theme files.
//!
//! A theme names the art for each region and carries the form overrides
//! for the stock loader:
//!
//! ```yaml
//! font: null
//! art:
//!   header: header.ans
//!   body: body.ans
//!   footerEdit: footer_edit.ans
//!   footerEditMenu: footer_menu.ans
//!   footerView: footer_view.ans
//! forms:
//!   0:
//!     fields:
//!       1: { accepts_focus: false }
//! ```
//!
//! Art paths are relative to the theme file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use af_art::ArtLibrary;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::loader::{MenuConfig, MenuConfigLoader};
use crate::region::Region;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Art variant to prefer.
    pub font: Option<String>,
    /// Art file per region.
    pub art: BTreeMap<Region, PathBuf>,
    pub forms: MenuConfig,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ThemeConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Directory art paths resolve against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Read every art file into a library, each under its region's name.
    pub fn art_library(&self) -> Result<ArtLibrary, ConfigError> {
        let mut library = ArtLibrary::new();
        for (region, file) in &self.art {
            library.load_file(region.name(), &self.base_dir.join(file))?;
        }
        Ok(library)
    }

    /// The stock loader over this theme's form overrides.
    #[must_use]
    pub fn menu_loader(&self) -> MenuConfigLoader {
        MenuConfigLoader::new(self.forms.clone())
    }
}
