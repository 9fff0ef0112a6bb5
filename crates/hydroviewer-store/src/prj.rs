//! CRS detection from shapefile `.prj` text.

use hydroviewer_core::models::Crs;

/// ESRI WKT written next to planar shapefiles
pub const WEB_MERCATOR_PRJ: &str = concat!(
    r#"PROJCS["WGS_1984_Web_Mercator_Auxiliary_Sphere","#,
    r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],"#,
    r#"PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],"#,
    r#"PROJECTION["Mercator_Auxiliary_Sphere"],PARAMETER["False_Easting",0.0],"#,
    r#"PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",0.0],"#,
    r#"PARAMETER["Standard_Parallel_1",0.0],PARAMETER["Auxiliary_Sphere_Type",0.0],"#,
    r#"UNIT["Meter",1.0]]"#
);

/// ESRI WKT for geographic WGS 84
pub const WGS84_PRJ: &str = concat!(
    r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],"#,
    r#"PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#
);

/// `.prj` text for a CRS, when one is known
pub fn prj_for(crs: &Crs) -> Option<&'static str> {
    match crs.epsg {
        3857 => Some(WEB_MERCATOR_PRJ),
        4326 => Some(WGS84_PRJ),
        _ => None,
    }
}

/// Detect the CRS a `.prj` file describes
///
/// Tries the outermost EPSG authority, then an `EPSG:` prefix, then
/// well-known names for Web Mercator and geographic WGS 84.
pub fn detect_crs(prj: &str) -> Option<Crs> {
    if let Some(epsg) = parse_epsg_from_wkt(prj) {
        return Some(Crs::from_epsg(epsg));
    }

    let normalized = prj.to_ascii_lowercase().replace([' ', '-'], "_");
    let is_web_mercator = ["web_mercator", "pseudo_mercator", "mercator_auxiliary_sphere"]
        .iter()
        .any(|marker| normalized.contains(marker));
    if is_web_mercator {
        return Some(Crs::web_mercator());
    }

    let trimmed = prj.trim_start();
    if trimmed.starts_with("GEOGCS")
        && (normalized.contains("wgs_1984") || normalized.contains("wgs_84"))
    {
        return Some(Crs::wgs84());
    }

    None
}

/// Parse an EPSG code from WKT text
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    // The CRS's own authority closes the WKT; inner ones belong to datums
    // and ellipsoids.
    const AUTHORITY: &str = "AUTHORITY[\"EPSG\",\"";
    if let Some(start) = wkt.rfind(AUTHORITY) {
        let code_start = start + AUTHORITY.len();
        if let Some(end) = wkt[code_start..].find('"') {
            if let Ok(code) = wkt[code_start..code_start + end].parse::<u32>() {
                return Some(code);
            }
        }
    }

    if let Some(start) = wkt.find("EPSG:") {
        let code: String = wkt[start + 5..]
            .chars()
            .skip_while(|c| *c == ':')
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(code) = code.parse::<u32>() {
            return Some(code);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_uses_outermost_code() {
        let wkt = r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],AUTHORITY["EPSG","4326"]],AUTHORITY["EPSG","3857"]]"#;
        assert_eq!(detect_crs(wkt), Some(Crs::web_mercator()));
    }

    #[test]
    fn test_epsg_prefix() {
        assert_eq!(detect_crs("EPSG:4326"), Some(Crs::wgs84()));
        assert_eq!(detect_crs("urn:ogc:def:crs:EPSG::3857"), Some(Crs::web_mercator()));
    }

    #[test]
    fn test_esri_names() {
        assert_eq!(detect_crs(WEB_MERCATOR_PRJ), Some(Crs::web_mercator()));
        assert_eq!(detect_crs(WGS84_PRJ), Some(Crs::wgs84()));
    }

    #[test]
    fn test_unknown_projection() {
        let utm = r#"PROJCS["WGS_1984_UTM_Zone_33N",GEOGCS["GCS_WGS_1984"],PROJECTION["Transverse_Mercator"]]"#;
        assert_eq!(detect_crs(utm), None);
    }
}
