use async_trait::async_trait;

use crate::error::Result;
use crate::models::MapServerTarget;

/// Source of named world-region polygons (ESRI Living Atlas)
#[async_trait]
pub trait AtlasSource: Send + Sync {
    /// Fetch the named region as GeoJSON text in EPSG:4326
    async fn fetch_region_geojson(&self, region: &str) -> Result<String>;

    /// Region names the source understands
    fn region_names(&self) -> &[&'static str];
}

/// Map server accepting zipped shapefile uploads
#[async_trait]
pub trait MapServer: Send + Sync {
    /// Create or overwrite the feature store `store` from a zipped shapefile
    async fn upload_shapefile(
        &self,
        target: &MapServerTarget,
        store: &str,
        zipped_shapefile: Vec<u8>,
    ) -> Result<()>;
}
