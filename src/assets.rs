use std::collections::HashMap;

use egui::{Color32, ColorImage, Pos2, TextureHandle, TextureOptions, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{self, GeometryError};

/// One manifest entry: a named flat-colour raster plus its authored
/// shape-local collision outline.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ImageSpec {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// RGBA fill colour.
    pub fill: [u8; 4],
    pub points: Vec<Pos2>,
}

/// A loaded asset: the GPU texture, its pixel size and the shape-local
/// points. Cloning is cheap (the texture handle is reference counted).
#[derive(Clone)]
pub struct Asset {
    pub texture: TextureHandle,
    pub size: Vec2,
    pub points: Vec<Pos2>,
}

impl std::fmt::Debug for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Asset")
            .field("texture", &self.texture.name())
            .field("size", &self.size)
            .field("points", &self.points)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {name:?} failed to load: zero-sized raster")]
    BadSize { name: String },
    #[error("asset {name:?} failed to load: {source}")]
    BadOutline {
        name: String,
        #[source]
        source: GeometryError,
    },
    #[error("asset {name:?} registered twice in the manifest")]
    Duplicate { name: String },
    #[error("no asset named {name:?}")]
    Missing { name: String },
}

/// All session assets, loaded up front. The session only starts once every
/// manifest entry has loaded; any failure aborts the load and names the
/// offending asset instead of stalling silently.
#[derive(Debug)]
pub struct AssetLibrary {
    assets: HashMap<String, Asset>,
}

impl AssetLibrary {
    pub fn load_all(ctx: &egui::Context, manifest: &[ImageSpec]) -> Result<Self, AssetError> {
        let mut assets = HashMap::new();

        for spec in manifest {
            let asset = load_one(ctx, spec)?;
            if assets.insert(spec.name.clone(), asset).is_some() {
                return Err(AssetError::Duplicate {
                    name: spec.name.clone(),
                });
            }
        }

        log::info!("loaded {} assets", assets.len());
        Ok(Self { assets })
    }

    pub fn get(&self, name: &str) -> Result<&Asset, AssetError> {
        self.assets.get(name).ok_or_else(|| AssetError::Missing {
            name: name.to_owned(),
        })
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn load_one(ctx: &egui::Context, spec: &ImageSpec) -> Result<Asset, AssetError> {
    if spec.width == 0 || spec.height == 0 {
        return Err(AssetError::BadSize {
            name: spec.name.clone(),
        });
    }

    // Validate the authored outline at load time, not on first use.
    geometry::segments_from_points(&spec.points).map_err(|source| AssetError::BadOutline {
        name: spec.name.clone(),
        source,
    })?;

    let fill = Color32::from_rgba_unmultiplied(spec.fill[0], spec.fill[1], spec.fill[2], spec.fill[3]);
    let image = ColorImage::new([spec.width, spec.height], fill);
    let texture = ctx.load_texture(&spec.name, image, TextureOptions::NEAREST);

    Ok(Asset {
        texture,
        size: egui::vec2(spec.width as f32, spec.height as f32),
        points: spec.points.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use egui::pos2;

    #[test]
    fn test_load_all_classic_manifest() {
        let ctx = egui::Context::default();
        let library = AssetLibrary::load_all(&ctx, &Config::classic().manifest).unwrap();

        assert_eq!(library.len(), 3);

        let ball = library.get("ball").unwrap();
        assert_eq!(ball.size, egui::vec2(20., 20.));
        assert_eq!(ball.points.len(), 8);
    }

    #[test]
    fn test_missing_asset_is_named() {
        let ctx = egui::Context::default();
        let library = AssetLibrary::load_all(&ctx, &Config::classic().manifest).unwrap();

        let err = library.get("lasers").unwrap_err();
        assert!(err.to_string().contains("lasers"));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let ctx = egui::Context::default();
        let mut manifest = Config::classic().manifest;
        manifest.push(manifest[0].clone());

        let err = AssetLibrary::load_all(&ctx, &manifest).unwrap_err();
        assert!(matches!(err, AssetError::Duplicate { name } if name == "ball"));
    }

    #[test]
    fn test_bad_outline_fails_the_whole_load() {
        let ctx = egui::Context::default();
        let mut manifest = Config::classic().manifest;
        manifest[1].points = vec![pos2(0., 0.)];

        let err = AssetLibrary::load_all(&ctx, &manifest).unwrap_err();
        assert!(matches!(err, AssetError::BadOutline { name, .. } if name == "paddle"));
    }

    #[test]
    fn test_zero_sized_raster_is_rejected() {
        let ctx = egui::Context::default();
        let mut manifest = Config::classic().manifest;
        manifest[2].width = 0;

        let err = AssetLibrary::load_all(&ctx, &manifest).unwrap_err();
        assert!(matches!(err, AssetError::BadSize { name } if name == "brick"));
    }
}
