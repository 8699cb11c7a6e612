//! Static asset and band tables keyed by instrument family and product group.
//!
//! Tables are never mutated; every scene gets fresh [`Asset`]s built from them.
use crate::io::href::sibling_href;
use crate::stac::{Asset, Band, media_type};
use crate::types::{InstrumentFamily, ProductGroup};

/// Spectral band attached to an asset as its `eo:bands` entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandDescriptor {
    pub name: &'static str,
    pub common_name: Option<&'static str>,
    pub description: Option<&'static str>,
    pub center_wavelength: Option<f64>,
    pub full_width_half_max: Option<f64>,
    pub gsd: Option<f64>,
}

impl BandDescriptor {
    pub fn to_band(&self) -> Band {
        Band {
            name: self.name.to_string(),
            common_name: self.common_name.map(str::to_string),
            description: self.description.map(str::to_string),
            center_wavelength: self.center_wavelength,
            full_width_half_max: self.full_width_half_max,
            gsd: self.gsd,
            extra_fields: Default::default(),
        }
    }
}

/// One row of an asset table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetDefinition {
    pub key: &'static str,
    /// File name suffix after `{base}_`
    pub suffix: &'static str,
    pub media_type: &'static str,
    pub title: &'static str,
    /// May contain a `Level-X` placeholder
    pub description: Option<&'static str>,
    pub roles: &'static [&'static str],
    pub gsd: Option<f64>,
    pub band: Option<BandDescriptor>,
    /// `raster:bands` data type
    pub data_type: Option<&'static str>,
}

impl AssetDefinition {
    pub fn href(&self, base: &str) -> String {
        sibling_href(base, self.suffix)
    }

    /// A new asset at `href` carrying this definition's metadata.
    pub fn to_asset(&self, href: String, level: u8) -> Asset {
        let mut asset = Asset::new(href);
        asset.media_type = Some(self.media_type.to_string());
        asset.title = Some(self.title.to_string());
        asset.description = self
            .description
            .map(|d| d.replace("Level-X", &format!("Level-{}", level)));
        asset.roles = self.roles.iter().map(|r| r.to_string()).collect();
        asset.gsd = self.gsd;
        if let Some(band) = &self.band {
            asset.bands = vec![band.to_band()];
        }
        asset
    }

    pub fn is_spectral(&self) -> bool {
        self.band.is_some()
    }
}

const fn file(
    key: &'static str,
    suffix: &'static str,
    media_type: &'static str,
    title: &'static str,
    description: Option<&'static str>,
    roles: &'static [&'static str],
) -> AssetDefinition {
    AssetDefinition {
        key,
        suffix,
        media_type,
        title,
        description,
        roles,
        gsd: None,
        band: None,
        data_type: None,
    }
}

const fn cog(
    key: &'static str,
    suffix: &'static str,
    title: &'static str,
    description: &'static str,
    roles: &'static [&'static str],
    gsd: Option<f64>,
    band: Option<BandDescriptor>,
    data_type: Option<&'static str>,
) -> AssetDefinition {
    AssetDefinition {
        key,
        suffix,
        media_type: media_type::COG,
        title,
        description: Some(description),
        roles,
        gsd,
        band,
        data_type,
    }
}

const fn optical(
    name: &'static str,
    common_name: &'static str,
    center_wavelength: f64,
) -> Option<BandDescriptor> {
    Some(BandDescriptor {
        name,
        common_name: Some(common_name),
        description: None,
        center_wavelength: Some(center_wavelength),
        full_width_half_max: None,
        gsd: None,
    })
}

const fn oli(
    name: &'static str,
    common_name: &'static str,
    center_wavelength: f64,
    full_width_half_max: f64,
    gsd: f64,
) -> Option<BandDescriptor> {
    Some(BandDescriptor {
        name,
        common_name: Some(common_name),
        description: None,
        center_wavelength: Some(center_wavelength),
        full_width_half_max: Some(full_width_half_max),
        gsd: Some(gsd),
    })
}

const fn auxiliary(name: &'static str, description: &'static str) -> Option<BandDescriptor> {
    Some(BandDescriptor {
        name,
        common_name: None,
        description: Some(description),
        center_wavelength: None,
        full_width_half_max: None,
        gsd: Some(30.0),
    })
}

const DATA: &[&str] = &["data"];

/// Metadata files and browse images shared by every sensor family.
pub const COMMON_FILE_ASSETS: &[AssetDefinition] = &[
    file(
        "thumbnail",
        "thumb_small.jpeg",
        media_type::JPEG,
        "Thumbnail image",
        None,
        &["thumbnail"],
    ),
    file(
        "reduced_resolution_browse",
        "thumb_large.jpeg",
        media_type::JPEG,
        "Reduced resolution browse image",
        None,
        &["overview"],
    ),
    file(
        "MTL.json",
        "MTL.json",
        media_type::JSON,
        "Product Metadata File (json)",
        Some("Collection 2 Level-X Product Metadata File (json)"),
        &["metadata"],
    ),
    file(
        "MTL.txt",
        "MTL.txt",
        media_type::TEXT,
        "Product Metadata File (txt)",
        Some("Collection 2 Level-X Product Metadata File (txt)"),
        &["metadata"],
    ),
    file(
        "MTL.xml",
        "MTL.xml",
        media_type::XML,
        "Product Metadata File (xml)",
        Some("Collection 2 Level-X Product Metadata File (xml)"),
        &["metadata"],
    ),
    ANG_ASSET,
];

pub const ANG_ASSET: AssetDefinition = file(
    "ANG",
    "ANG.txt",
    media_type::TEXT,
    "Angle Coefficients File",
    Some("Collection 2 Level-X Angle Coefficients File (ANG)"),
    &["metadata"],
);

/// Quality assessment bands shared by every sensor family.
pub const QA_ASSETS: &[AssetDefinition] = &[
    cog(
        "QA_PIXEL",
        "QA_PIXEL.TIF",
        "Pixel Quality Assessment Band",
        "Collection 2 Level-1 Pixel Quality Assessment Band",
        DATA,
        None,
        None,
        Some("uint16"),
    ),
    cog(
        "QA_RADSAT",
        "QA_RADSAT.TIF",
        "Radiometric Saturation Quality Assessment Band",
        "Collection 2 Level-1 Radiometric Saturation Quality Assessment Band",
        DATA,
        None,
        None,
        Some("uint16"),
    ),
];

pub const MSS_SR_ASSETS: &[AssetDefinition] = &[
    cog(
        "B4",
        "B4.TIF",
        "Green Band (B4)",
        "Collection 2 Level-1 Green Band (B4) Top of Atmosphere Radiance",
        DATA,
        Some(60.0),
        optical("B4", "green", 0.55),
        Some("uint8"),
    ),
    cog(
        "B5",
        "B5.TIF",
        "Red Band (B5)",
        "Collection 2 Level-1 Red Band (B5) Top of Atmosphere Radiance",
        DATA,
        Some(60.0),
        optical("B5", "red", 0.65),
        Some("uint8"),
    ),
    cog(
        "B6",
        "B6.TIF",
        "Near Infrared Band 0.7 (B6)",
        "Collection 2 Level-1 Near Infrared Band 0.7 (B6) Top of Atmosphere Radiance",
        DATA,
        Some(60.0),
        optical("B6", "nir08", 0.75),
        Some("uint8"),
    ),
    cog(
        "B7",
        "B7.TIF",
        "Near Infrared Band 0.9 (B7)",
        "Collection 2 Level-1 Near Infrared Band 0.9 (B7) Top of Atmosphere Radiance",
        DATA,
        Some(60.0),
        optical("B7", "nir09", 0.95),
        Some("uint8"),
    ),
];

pub const TM_ETM_SR_ASSETS: &[AssetDefinition] = &[
    cog(
        "SR_B1",
        "SR_B1.TIF",
        "Blue Band (B1)",
        "Collection 2 Level-2 Blue Band (B1) Surface Reflectance",
        DATA,
        Some(30.0),
        optical("B1", "blue", 0.49),
        Some("uint16"),
    ),
    cog(
        "SR_B2",
        "SR_B2.TIF",
        "Green Band (B2)",
        "Collection 2 Level-2 Green Band (B2) Surface Reflectance",
        DATA,
        Some(30.0),
        optical("B2", "green", 0.56),
        Some("uint16"),
    ),
    cog(
        "SR_B3",
        "SR_B3.TIF",
        "Red Band (B3)",
        "Collection 2 Level-2 Red Band (B3) Surface Reflectance",
        DATA,
        Some(30.0),
        optical("B3", "red", 0.66),
        Some("uint16"),
    ),
    cog(
        "SR_B4",
        "SR_B4.TIF",
        "Near Infrared Band 0.8 (B4)",
        "Collection 2 Level-2 Near Infrared Band 0.8 (B4) Surface Reflectance",
        DATA,
        Some(30.0),
        optical("B4", "nir08", 0.84),
        Some("uint16"),
    ),
    cog(
        "SR_B5",
        "SR_B5.TIF",
        "Short-wave Infrared Band 1.6 (B5)",
        "Collection 2 Level-2 Short-wave Infrared Band 1.6 (B5) Surface Reflectance",
        DATA,
        Some(30.0),
        optical("B5", "swir16", 1.65),
        Some("uint16"),
    ),
    cog(
        "SR_B7",
        "SR_B7.TIF",
        "Short-wave Infrared Band 2.2 (B7)",
        "Collection 2 Level-2 Short-wave Infrared Band 2.2 (B7) Surface Reflectance",
        DATA,
        Some(30.0),
        optical("B7", "swir22", 2.22),
        Some("uint16"),
    ),
    cog(
        "SR_ATMOS_OPACITY",
        "SR_ATMOS_OPACITY.TIF",
        "Atmospheric Opacity Band",
        "Collection 2 Level-2 Atmospheric Opacity Band Surface Reflectance",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "SR_CLOUD_QA",
        "SR_CLOUD_QA.TIF",
        "Cloud Quality Analysis Band",
        "Collection 2 Level-2 Cloud Quality Opacity Band Surface Reflectance",
        DATA,
        None,
        None,
        None,
    ),
];

pub const TM_ETM_ST_ASSETS: &[AssetDefinition] = &[
    cog(
        "ST_B6",
        "ST_B6.TIF",
        "Surface Temperature Band (B6)",
        "Landsat Collection 2 Level-2 Surface Temperature Band (B6) Surface Temperature Product",
        DATA,
        Some(120.0),
        optical("B6", "lwir", 11.45),
        Some("uint16"),
    ),
    cog(
        "ST_ATRAN",
        "ST_ATRAN.TIF",
        "Atmospheric Transmittance Band",
        "Landsat Collection 2 Level-2 Atmospheric Transmittance Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_CDIST",
        "ST_CDIST.TIF",
        "Cloud Distance Band",
        "Landsat Collection 2 Level-2 Cloud Distance Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_DRAD",
        "ST_DRAD.TIF",
        "Downwelled Radiance Band",
        "Landsat Collection 2 Level-2 Downwelled Radiance Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_URAD",
        "ST_URAD.TIF",
        "Upwelled Radiance Band",
        "Landsat Collection 2 Level-2 Upwelled Radiance Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_TRAD",
        "ST_TRAD.TIF",
        "Thermal Radiance Band",
        "Landsat Collection 2 Level-2 Thermal Radiance Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_EMIS",
        "ST_EMIS.TIF",
        "Emissivity Band",
        "Landsat Collection 2 Level-2 Emissivity Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_EMSD",
        "ST_EMSD.TIF",
        "Emissivity Standard Deviation Band",
        "Landsat Collection 2 Level-2 Emissivity Standard Deviation Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
    cog(
        "ST_QA",
        "ST_QA.TIF",
        "Surface Temperature Quality Assessment Band",
        "Landsat Collection 2 Level-2 Surface Temperature Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
];

pub const OLI_TIRS_SR_ASSETS: &[AssetDefinition] = &[
    cog(
        "SR_B1",
        "SR_B1.TIF",
        "Coastal/Aerosol Band (B1)",
        "Collection 2 Level-2 Coastal/Aerosol Band (B1) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B1", "coastal", 0.44, 0.02, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_B2",
        "SR_B2.TIF",
        "Blue Band (B2)",
        "Collection 2 Level-2 Blue Band (B2) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B2", "blue", 0.48, 0.06, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_B3",
        "SR_B3.TIF",
        "Green Band (B3)",
        "Collection 2 Level-2 Green Band (B3) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B3", "green", 0.56, 0.06, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_B4",
        "SR_B4.TIF",
        "Red Band (B4)",
        "Collection 2 Level-2 Red Band (B4) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B4", "red", 0.65, 0.04, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_B5",
        "SR_B5.TIF",
        "Near Infrared Band 0.8 (B5)",
        "Collection 2 Level-2 Near Infrared Band 0.8 (B5) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B5", "nir08", 0.86, 0.03, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_B6",
        "SR_B6.TIF",
        "Short-wave Infrared Band 1.6 (B6)",
        "Collection 2 Level-2 Short-wave Infrared Band 1.6 (B6) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B6", "swir16", 1.6, 0.08, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_B7",
        "SR_B7.TIF",
        "Short-wave Infrared Band 2.2 (B7)",
        "Collection 2 Level-2 Short-wave Infrared Band 2.2 (B7) Surface Reflectance",
        DATA,
        Some(30.0),
        oli("SR_B7", "swir22", 2.2, 0.2, 30.0),
        Some("uint16"),
    ),
    cog(
        "SR_QA_AEROSOL",
        "SR_QA_AEROSOL.TIF",
        "Aerosol Quality Analysis Band",
        "Collection 2 Level-2 Aerosol Quality Analysis Band Surface Reflectance",
        DATA,
        None,
        None,
        None,
    ),
];

pub const OLI_TIRS_ST_ASSETS: &[AssetDefinition] = &[
    // common name follows the 10.9um centre wavelength; sensor resolution is 100m
    // although the raster is delivered at 30m
    cog(
        "ST_B10",
        "ST_B10.TIF",
        "Surface Temperature Band (B10)",
        "Landsat Collection 2 Level-2 Surface Temperature Band (B10) Surface Temperature Product",
        DATA,
        Some(100.0),
        oli("ST_B10", "lwir11", 10.9, 0.8, 100.0),
        Some("uint16"),
    ),
    cog(
        "ST_ATRAN",
        "ST_ATRAN.TIF",
        "Atmospheric Transmittance Band",
        "Landsat Collection 2 Level-2 Atmospheric Transmittance Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_ATRAN", "atmospheric transmission"),
        None,
    ),
    cog(
        "ST_CDIST",
        "ST_CDIST.TIF",
        "Cloud Distance Band",
        "Landsat Collection 2 Level-2 Cloud Distance Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_CDIST", "distance to nearest cloud"),
        None,
    ),
    cog(
        "ST_DRAD",
        "ST_DRAD.TIF",
        "Downwelled Radiance Band",
        "Landsat Collection 2 Level-2 Downwelled Radiance Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_DRAD", "downwelled radiance"),
        None,
    ),
    cog(
        "ST_URAD",
        "ST_URAD.TIF",
        "Upwelled Radiance Band",
        "Landsat Collection 2 Level-2 Upwelled Radiance Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_URAD", "upwelled radiance"),
        None,
    ),
    cog(
        "ST_TRAD",
        "ST_TRAD.TIF",
        "Thermal Radiance Band",
        "Landsat Collection 2 Level-2 Thermal Radiance Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_TRAD", "thermal radiance"),
        None,
    ),
    cog(
        "ST_EMIS",
        "ST_EMIS.TIF",
        "Emissivity Band",
        "Landsat Collection 2 Level-2 Emissivity Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_EMIS", "emissivity"),
        None,
    ),
    cog(
        "ST_EMSD",
        "ST_EMSD.TIF",
        "Emissivity Standard Deviation Band",
        "Landsat Collection 2 Level-2 Emissivity Standard Deviation Band Surface Temperature Product",
        DATA,
        None,
        auxiliary("ST_EMSD", "emissivity standard deviation"),
        None,
    ),
    cog(
        "ST_QA",
        "ST_QA.TIF",
        "Surface Temperature Quality Assessment Band",
        "Landsat Collection 2 Level-2 Surface Temperature Band Surface Temperature Product",
        DATA,
        None,
        None,
        None,
    ),
];

/// Asset table for one instrument family and product group.
pub fn asset_table(family: InstrumentFamily, group: ProductGroup) -> &'static [AssetDefinition] {
    match (family, group) {
        (InstrumentFamily::Mss, ProductGroup::Sr) => MSS_SR_ASSETS,
        (InstrumentFamily::Mss, ProductGroup::St) => &[],
        (InstrumentFamily::TmEtm, ProductGroup::Sr) => TM_ETM_SR_ASSETS,
        (InstrumentFamily::TmEtm, ProductGroup::St) => TM_ETM_ST_ASSETS,
        (InstrumentFamily::OliTirs, ProductGroup::Sr) => OLI_TIRS_SR_ASSETS,
        (InstrumentFamily::OliTirs, ProductGroup::St) => OLI_TIRS_ST_ASSETS,
    }
}

/// Common file assets followed by the QA bands.
pub fn common_assets() -> impl Iterator<Item = &'static AssetDefinition> {
    COMMON_FILE_ASSETS.iter().chain(QA_ASSETS.iter())
}

/// Look up `key` in the family's SR and ST tables, then among the common assets.
pub fn find_asset(family: InstrumentFamily, key: &str) -> Option<&'static AssetDefinition> {
    asset_table(family, ProductGroup::Sr)
        .iter()
        .chain(asset_table(family, ProductGroup::St))
        .chain(common_assets())
        .find(|def| def.key == key)
}
